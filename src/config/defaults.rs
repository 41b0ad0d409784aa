// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Volume**: Audio playback volume settings
//! - **Seek**: Keyboard seek step and seek acknowledgement bounds
//! - **Controls**: Control overlay auto-hide timing
//! - **Progress**: Timeline refresh cadence
//! - **Persistence**: Resume position write throttling

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Default playback volume (0.0 to 1.0, where 1.0 = 100%).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume adjustment step per key press (10%).
pub const VOLUME_STEP: f32 = 0.1;

// ==========================================================================
// Seek Defaults
// ==========================================================================

/// Default keyboard seek step in seconds (arrow keys).
pub const DEFAULT_KEYBOARD_SEEK_STEP_SECS: f64 = 10.0;

/// Minimum keyboard seek step in seconds.
pub const MIN_KEYBOARD_SEEK_STEP_SECS: f64 = 1.0;

/// Maximum keyboard seek step in seconds.
pub const MAX_KEYBOARD_SEEK_STEP_SECS: f64 = 60.0;

/// How close the element's reported time must be to a seek target before
/// the seek counts as acknowledged (seconds).
pub const SEEK_ACK_TOLERANCE_SECS: f64 = 0.5;

/// Upper bound on waiting for a seek acknowledgement (milliseconds).
/// After this the session assumes the element landed where it was told.
pub const SEEK_ACK_TIMEOUT_MILLIS: u64 = 2000;

// ==========================================================================
// Control Overlay Defaults
// ==========================================================================

/// Default inactivity delay before the control overlay hides (seconds).
pub const DEFAULT_HIDE_DELAY_SECS: u64 = 2;

/// Minimum control overlay hide delay (seconds).
pub const MIN_HIDE_DELAY_SECS: u64 = 1;

/// Maximum control overlay hide delay (seconds).
pub const MAX_HIDE_DELAY_SECS: u64 = 30;

// ==========================================================================
// Progress Refresh Defaults
// ==========================================================================

/// Timeline and buffered-range refresh cadence (milliseconds).
pub const PROGRESS_REFRESH_MILLIS: u64 = 250;

// ==========================================================================
// Persistence Defaults
// ==========================================================================

/// Default minimum interval between throttled resume-position writes (seconds).
pub const DEFAULT_SAVE_INTERVAL_SECS: u64 = 5;

/// Minimum resume-position write interval (seconds).
pub const MIN_SAVE_INTERVAL_SECS: u64 = 1;

/// Maximum resume-position write interval (seconds).
pub const MAX_SAVE_INTERVAL_SECS: u64 = 60;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Volume validation
    assert!(MIN_VOLUME >= 0.0);
    assert!(MAX_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_VOLUME >= MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);
    assert!(VOLUME_STEP > 0.0);
    assert!(VOLUME_STEP < MAX_VOLUME - MIN_VOLUME);

    // Keyboard seek step validation
    assert!(MIN_KEYBOARD_SEEK_STEP_SECS > 0.0);
    assert!(MAX_KEYBOARD_SEEK_STEP_SECS >= MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS >= MIN_KEYBOARD_SEEK_STEP_SECS);
    assert!(DEFAULT_KEYBOARD_SEEK_STEP_SECS <= MAX_KEYBOARD_SEEK_STEP_SECS);

    // Seek acknowledgement validation
    assert!(SEEK_ACK_TOLERANCE_SECS > 0.0);
    assert!(SEEK_ACK_TIMEOUT_MILLIS > 0);

    // Hide delay validation
    assert!(MIN_HIDE_DELAY_SECS > 0);
    assert!(MAX_HIDE_DELAY_SECS >= MIN_HIDE_DELAY_SECS);
    assert!(DEFAULT_HIDE_DELAY_SECS >= MIN_HIDE_DELAY_SECS);
    assert!(DEFAULT_HIDE_DELAY_SECS <= MAX_HIDE_DELAY_SECS);

    // Progress refresh validation
    assert!(PROGRESS_REFRESH_MILLIS > 0);

    // Save interval validation
    assert!(MIN_SAVE_INTERVAL_SECS > 0);
    assert!(MAX_SAVE_INTERVAL_SECS >= MIN_SAVE_INTERVAL_SECS);
    assert!(DEFAULT_SAVE_INTERVAL_SECS >= MIN_SAVE_INTERVAL_SECS);
    assert!(DEFAULT_SAVE_INTERVAL_SECS <= MAX_SAVE_INTERVAL_SECS);
};
