// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language selection
//! - `[playback]` - Volume, mute, keyboard seek step, save throttling
//! - `[controls]` - Control overlay auto-hide timing
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `PLAYDECK_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use playdeck::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.general.language = Some("fr".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Playback volume (0.0 to 1.0).
    #[serde(default = "default_volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    /// Whether audio is muted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    /// Keyboard seek step in seconds (arrow keys).
    #[serde(
        default = "default_keyboard_seek_step_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub keyboard_seek_step_secs: Option<f64>,

    /// Minimum interval between throttled resume-position writes (seconds).
    #[serde(
        default = "default_save_interval_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub resume_save_interval_secs: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: Some(DEFAULT_VOLUME),
            muted: Some(false),
            keyboard_seek_step_secs: default_keyboard_seek_step_secs(),
            resume_save_interval_secs: default_save_interval_secs(),
        }
    }
}

/// Control overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlsConfig {
    /// Inactivity delay before the control overlay hides (seconds).
    #[serde(
        default = "default_hide_delay_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub hide_delay_secs: Option<u64>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_secs: Some(DEFAULT_HIDE_DELAY_SECS),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Playback settings.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Control overlay settings.
    #[serde(default)]
    pub controls: ControlsConfig,
}

impl Config {
    /// Starting volume, clamped to the valid range.
    pub fn effective_volume(&self) -> f32 {
        self.playback
            .volume
            .unwrap_or(DEFAULT_VOLUME)
            .clamp(MIN_VOLUME, MAX_VOLUME)
    }

    /// Whether audio starts muted.
    pub fn starts_muted(&self) -> bool {
        self.playback.muted.unwrap_or(false)
    }

    /// Keyboard seek step, clamped to the valid range.
    pub fn seek_step_secs(&self) -> f64 {
        self.playback
            .keyboard_seek_step_secs
            .unwrap_or(DEFAULT_KEYBOARD_SEEK_STEP_SECS)
            .clamp(MIN_KEYBOARD_SEEK_STEP_SECS, MAX_KEYBOARD_SEEK_STEP_SECS)
    }

    /// Control overlay hide delay, clamped to the valid range.
    pub fn hide_delay(&self) -> Duration {
        let secs = self
            .controls
            .hide_delay_secs
            .unwrap_or(DEFAULT_HIDE_DELAY_SECS)
            .clamp(MIN_HIDE_DELAY_SECS, MAX_HIDE_DELAY_SECS);
        Duration::from_secs(secs)
    }

    /// Minimum interval between throttled resume writes, clamped to the
    /// valid range.
    pub fn save_interval(&self) -> Duration {
        let secs = self
            .playback
            .resume_save_interval_secs
            .unwrap_or(DEFAULT_SAVE_INTERVAL_SECS)
            .clamp(MIN_SAVE_INTERVAL_SECS, MAX_SAVE_INTERVAL_SECS);
        Duration::from_secs(secs)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_volume() -> Option<f32> {
    Some(DEFAULT_VOLUME)
}

fn default_keyboard_seek_step_secs() -> Option<f64> {
    Some(DEFAULT_KEYBOARD_SEEK_STEP_SECS)
}

fn default_save_interval_secs() -> Option<u64> {
    Some(DEFAULT_SAVE_INTERVAL_SECS)
}

fn default_hide_delay_secs() -> Option<u64> {
    Some(DEFAULT_HIDE_DELAY_SECS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(_) => {
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
