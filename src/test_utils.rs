// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Playback math lives in `f32`/`f64` (positions, fractions, volume), so
//! the assertions here come from `approx` instead of `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};

/// Epsilon for `f32` values that went through one or two arithmetic steps.
pub const F32_EPSILON: f32 = 1e-6;

/// Epsilon for `f64` timestamps that went through clamping or mapping.
pub const F64_EPSILON: f64 = 1e-9;
