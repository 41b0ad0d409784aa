// SPDX-License-Identifier: MPL-2.0
//! Control overlay visibility.
//!
//! The overlay shows on any activity and hides after a configurable spell
//! of inactivity. Paused playback pins it visible; hiding the controls over
//! a static frame would leave nothing to look at and nothing to click.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsVisibility {
    Visible,
    Hidden,
}

/// Visibility state machine: Visible <-> Hidden on an inactivity timer.
#[derive(Debug)]
pub struct VisibilityController {
    visibility: ControlsVisibility,
    hide_delay: Duration,
    /// None until the first tick; the clock starts when the player mounts.
    last_activity: Option<Instant>,
}

impl VisibilityController {
    /// Starts visible, with the inactivity clock not yet running.
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            visibility: ControlsVisibility::Visible,
            hide_delay,
            last_activity: None,
        }
    }

    pub fn visibility(&self) -> ControlsVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == ControlsVisibility::Visible
    }

    /// Pointer movement or any control interaction: show and restart the
    /// inactivity timer.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = Some(now);
        self.visibility = ControlsVisibility::Visible;
    }

    /// Advances the inactivity timer.
    ///
    /// `pinned` holds the overlay visible and keeps resetting the timer, so
    /// unpinning starts a fresh inactivity window. The embedding component
    /// pins while playback is paused (and while a menu is open).
    pub fn tick(&mut self, now: Instant, pinned: bool) {
        if pinned {
            self.visibility = ControlsVisibility::Visible;
            self.last_activity = Some(now);
            return;
        }
        let Some(last) = self.last_activity else {
            self.last_activity = Some(now);
            return;
        };
        if now.saturating_duration_since(last) >= self.hide_delay {
            self.visibility = ControlsVisibility::Hidden;
        }
    }
}
