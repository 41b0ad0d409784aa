// SPDX-License-Identifier: MPL-2.0
//! Progress bar scrubbing and throttled progress readout.
//!
//! Dragging the scrub track previews a timestamp without ever touching
//! playback; only releasing the pointer commits, and it commits exactly one
//! seek. The released commit then waits for the element to reach the target
//! (within tolerance) or for a bounded timeout, so a seek the backend never
//! applies cannot wedge the UI in a committing state.
//!
//! The visible progress fill is a separate concern: [`ProgressReadout`]
//! refreshes from the session on a fixed cadence while no drag is active,
//! fully decoupled from the gesture.

use std::time::{Duration, Instant};

use crate::config::defaults;

/// Horizontal extent of the scrub track, in the same space as pointer x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub left: f32,
    pub width: f32,
}

impl TrackBounds {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    pub fn contains_x(&self, x: f32) -> bool {
        self.width > 0.0 && x >= self.left && x <= self.left + self.width
    }
}

/// Maps a pointer x position on the track to a timestamp.
///
/// Positions outside the track clamp to the nearest end. A degenerate track
/// or unknown duration maps everything to zero.
pub fn pointer_to_secs(x: f32, track: TrackBounds, duration_secs: f64) -> f64 {
    if track.width <= 0.0 || duration_secs <= 0.0 {
        return 0.0;
    }
    let fraction = ((x - track.left) / track.width).clamp(0.0, 1.0);
    f64::from(fraction) * duration_secs
}

/// Transient pointer gesture, alive from pointer-down to release/cancel.
#[derive(Debug, Clone, Copy)]
struct ScrubGesture {
    start_x: f32,
    current_x: f32,
    preview_secs: f64,
}

/// Externally visible gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubPhase {
    Idle,
    /// Pointer held down; the preview follows the pointer.
    Dragging,
    /// Seek committed on release; waiting for acknowledgement.
    Committing,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Dragging(ScrubGesture),
    Committing { target_secs: f64, since: Instant },
}

/// Scrub gesture state machine: Idle -> Dragging -> Committing -> Idle.
#[derive(Debug)]
pub struct ScrubController {
    phase: Phase,
}

impl ScrubController {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> ScrubPhase {
        match self.phase {
            Phase::Idle => ScrubPhase::Idle,
            Phase::Dragging(_) => ScrubPhase::Dragging,
            Phase::Committing { .. } => ScrubPhase::Committing,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.phase, Phase::Committing { .. })
    }

    /// The previewed timestamp, while a drag is active.
    pub fn preview_secs(&self) -> Option<f64> {
        match self.phase {
            Phase::Dragging(gesture) => Some(gesture.preview_secs),
            _ => None,
        }
    }

    /// Pointer-down on the track starts a drag.
    ///
    /// A pointer-down while a previous commit is still waiting starts a new
    /// gesture; the old commit's outcome no longer matters to the UI.
    pub fn begin_drag(&mut self, x: f32, track: TrackBounds, duration_secs: f64) {
        let preview_secs = pointer_to_secs(x, track, duration_secs);
        self.phase = Phase::Dragging(ScrubGesture {
            start_x: x,
            current_x: x,
            preview_secs,
        });
    }

    /// Pointer movement recomputes the preview. Playback is never touched.
    pub fn update_drag(&mut self, x: f32, track: TrackBounds, duration_secs: f64) {
        if let Phase::Dragging(gesture) = &mut self.phase {
            gesture.current_x = x;
            gesture.preview_secs = pointer_to_secs(x, track, duration_secs);
        }
    }

    /// Begins or moves a drag from a widget that reports timestamps
    /// directly (a slider's change callback) instead of raw pointer x.
    /// Pointer travel is not tracked on this path.
    pub fn preview_to(&mut self, secs: f64, duration_secs: f64) {
        let preview_secs = if duration_secs > 0.0 {
            secs.clamp(0.0, duration_secs)
        } else {
            0.0
        };
        match &mut self.phase {
            Phase::Dragging(gesture) => gesture.preview_secs = preview_secs,
            _ => {
                self.phase = Phase::Dragging(ScrubGesture {
                    start_x: 0.0,
                    current_x: 0.0,
                    preview_secs,
                });
            }
        }
    }

    /// How far the pointer travelled since pointer-down, while dragging.
    pub fn drag_distance(&self) -> Option<f32> {
        match self.phase {
            Phase::Dragging(gesture) => Some(gesture.current_x - gesture.start_x),
            _ => None,
        }
    }

    /// Pointer release commits the previewed timestamp.
    ///
    /// Returns the seek target exactly once per gesture; the caller issues
    /// the actual `seek_to`. Releases outside a drag return nothing.
    pub fn release(&mut self, now: Instant) -> Option<f64> {
        match self.phase {
            Phase::Dragging(gesture) => {
                self.phase = Phase::Committing {
                    target_secs: gesture.preview_secs,
                    since: now,
                };
                Some(gesture.preview_secs)
            }
            _ => None,
        }
    }

    /// Abandons an active drag without seeking (pointer cancel, focus loss).
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Dragging(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Advances the commit wait. Call on every tick with the position the
    /// session currently reports.
    ///
    /// The commit resolves when the reported position lands within
    /// tolerance of the target, or when the bounded timeout passes,
    /// whichever comes first. Returns true the moment it resolves.
    pub fn tick(&mut self, now: Instant, reported_secs: f64) -> bool {
        let Phase::Committing { target_secs, since } = self.phase else {
            return false;
        };
        let acknowledged = (reported_secs - target_secs).abs() <= defaults::SEEK_ACK_TOLERANCE_SECS;
        let timed_out = now.saturating_duration_since(since)
            >= Duration::from_millis(defaults::SEEK_ACK_TIMEOUT_MILLIS);
        if acknowledged || timed_out {
            self.phase = Phase::Idle;
            return true;
        }
        false
    }
}

impl Default for ScrubController {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Progress readout
// =============================================================================

/// One refresh of the progress bar's data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub position_secs: f64,
    pub buffered_end_secs: f64,
    pub duration_secs: Option<f64>,
}

impl ProgressSnapshot {
    fn empty() -> Self {
        Self {
            position_secs: 0.0,
            buffered_end_secs: 0.0,
            duration_secs: None,
        }
    }

    /// Played fraction of the bar, 0 while the duration is unknown.
    pub fn progress_fraction(&self) -> f32 {
        fraction_of(self.position_secs, self.duration_secs)
    }

    /// Buffered fraction of the bar, 0 while the duration is unknown.
    pub fn buffered_fraction(&self) -> f32 {
        fraction_of(self.buffered_end_secs, self.duration_secs)
    }
}

fn fraction_of(value_secs: f64, duration_secs: Option<f64>) -> f32 {
    match duration_secs {
        Some(duration) if duration > 0.0 => ((value_secs / duration).clamp(0.0, 1.0)) as f32,
        _ => 0.0,
    }
}

/// Refreshes progress data on a fixed cadence.
///
/// The bar does not need a new value on every tick; a few refreshes per
/// second is indistinguishable to the eye. The embedding component skips
/// refreshing while a drag is active so the preview owns the bar.
#[derive(Debug)]
pub struct ProgressReadout {
    snapshot: ProgressSnapshot,
    last_refresh: Option<Instant>,
}

impl ProgressReadout {
    pub fn new() -> Self {
        Self {
            snapshot: ProgressSnapshot::empty(),
            last_refresh: None,
        }
    }

    /// Takes a new snapshot unless one was taken too recently.
    ///
    /// Returns whether the snapshot was refreshed.
    pub fn refresh(
        &mut self,
        now: Instant,
        position_secs: f64,
        buffered_end_secs: f64,
        duration_secs: Option<f64>,
    ) -> bool {
        if let Some(last) = self.last_refresh {
            let cadence = Duration::from_millis(defaults::PROGRESS_REFRESH_MILLIS);
            if now.saturating_duration_since(last) < cadence {
                return false;
            }
        }
        self.last_refresh = Some(now);
        self.snapshot = ProgressSnapshot {
            position_secs,
            buffered_end_secs,
            duration_secs,
        };
        true
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot
    }
}

impl Default for ProgressReadout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    const TRACK: TrackBounds = TrackBounds {
        left: 100.0,
        width: 400.0,
    };

    #[test]
    fn pointer_maps_linearly_across_the_track() {
        assert_abs_diff_eq!(pointer_to_secs(100.0, TRACK, 600.0), 0.0);
        assert_abs_diff_eq!(pointer_to_secs(300.0, TRACK, 600.0), 300.0);
        assert_abs_diff_eq!(pointer_to_secs(500.0, TRACK, 600.0), 600.0);
    }

    #[test]
    fn pointer_outside_the_track_clamps_to_the_ends() {
        assert_abs_diff_eq!(pointer_to_secs(-50.0, TRACK, 600.0), 0.0);
        assert_abs_diff_eq!(pointer_to_secs(1000.0, TRACK, 600.0), 600.0);
    }

    #[test]
    fn degenerate_track_or_duration_maps_to_zero() {
        let flat = TrackBounds::new(100.0, 0.0);
        assert_abs_diff_eq!(pointer_to_secs(300.0, flat, 600.0), 0.0);
        assert_abs_diff_eq!(pointer_to_secs(300.0, TRACK, 0.0), 0.0);
    }

    #[test]
    fn track_bounds_hit_test() {
        assert!(TRACK.contains_x(100.0));
        assert!(TRACK.contains_x(500.0));
        assert!(!TRACK.contains_x(99.0));
        assert!(!TRACK.contains_x(501.0));
    }

    #[test]
    fn dragging_previews_without_committing() {
        let mut scrub = ScrubController::new();

        scrub.begin_drag(200.0, TRACK, 600.0);
        assert_eq!(scrub.phase(), ScrubPhase::Dragging);
        assert_eq!(scrub.preview_secs(), Some(150.0));

        scrub.update_drag(400.0, TRACK, 600.0);
        assert_eq!(scrub.preview_secs(), Some(450.0));
        assert_eq!(scrub.drag_distance(), Some(200.0));
    }

    #[test]
    fn slider_preview_begins_and_moves_a_drag() {
        let mut scrub = ScrubController::new();

        scrub.preview_to(120.0, 600.0);
        assert_eq!(scrub.phase(), ScrubPhase::Dragging);
        assert_eq!(scrub.preview_secs(), Some(120.0));

        scrub.preview_to(480.0, 600.0);
        assert_eq!(scrub.preview_secs(), Some(480.0));

        // Out-of-range values clamp just like pointer positions do.
        scrub.preview_to(900.0, 600.0);
        assert_eq!(scrub.preview_secs(), Some(600.0));
    }

    #[test]
    fn slider_preview_then_release_commits_the_last_value() {
        let mut scrub = ScrubController::new();
        scrub.preview_to(30.0, 600.0);
        scrub.preview_to(45.0, 600.0);

        assert_eq!(scrub.release(Instant::now()), Some(45.0));
        assert_eq!(scrub.phase(), ScrubPhase::Committing);
    }

    #[test]
    fn release_commits_exactly_once() {
        let mut scrub = ScrubController::new();
        let now = Instant::now();

        scrub.begin_drag(300.0, TRACK, 600.0);
        assert_eq!(scrub.release(now), Some(300.0));
        assert_eq!(scrub.phase(), ScrubPhase::Committing);

        // A stray second release has nothing left to commit.
        assert_eq!(scrub.release(now), None);
    }

    #[test]
    fn release_without_drag_is_inert() {
        let mut scrub = ScrubController::new();
        assert_eq!(scrub.release(Instant::now()), None);
        assert_eq!(scrub.phase(), ScrubPhase::Idle);
    }

    #[test]
    fn cancel_discards_the_gesture() {
        let mut scrub = ScrubController::new();
        scrub.begin_drag(300.0, TRACK, 600.0);

        scrub.cancel();

        assert_eq!(scrub.phase(), ScrubPhase::Idle);
        assert_eq!(scrub.release(Instant::now()), None);
    }

    #[test]
    fn commit_resolves_when_position_reaches_tolerance() {
        let mut scrub = ScrubController::new();
        let now = Instant::now();
        scrub.begin_drag(300.0, TRACK, 600.0);
        scrub.release(now);

        // Element still reporting the old position: keep waiting.
        assert!(!scrub.tick(now + Duration::from_millis(100), 42.0));
        assert_eq!(scrub.phase(), ScrubPhase::Committing);

        // Landed within half a second of the target: resolved.
        assert!(scrub.tick(now + Duration::from_millis(200), 299.6));
        assert_eq!(scrub.phase(), ScrubPhase::Idle);
    }

    #[test]
    fn commit_resolves_after_bounded_timeout() {
        let mut scrub = ScrubController::new();
        let now = Instant::now();
        scrub.begin_drag(300.0, TRACK, 600.0);
        scrub.release(now);

        let late = now + Duration::from_millis(defaults::SEEK_ACK_TIMEOUT_MILLIS + 100);
        assert!(scrub.tick(late, 42.0));
        assert_eq!(scrub.phase(), ScrubPhase::Idle);
    }

    #[test]
    fn new_drag_supersedes_a_waiting_commit() {
        let mut scrub = ScrubController::new();
        let now = Instant::now();
        scrub.begin_drag(300.0, TRACK, 600.0);
        scrub.release(now);

        scrub.begin_drag(200.0, TRACK, 600.0);

        assert_eq!(scrub.phase(), ScrubPhase::Dragging);
        assert_eq!(scrub.preview_secs(), Some(150.0));
    }

    #[test]
    fn readout_throttles_refreshes() {
        let mut readout = ProgressReadout::new();
        let now = Instant::now();

        assert!(readout.refresh(now, 10.0, 20.0, Some(600.0)));
        assert!(!readout.refresh(now + Duration::from_millis(100), 11.0, 21.0, Some(600.0)));
        assert_eq!(readout.snapshot().position_secs, 10.0);

        let later = now + Duration::from_millis(defaults::PROGRESS_REFRESH_MILLIS);
        assert!(readout.refresh(later, 12.0, 22.0, Some(600.0)));
        assert_eq!(readout.snapshot().position_secs, 12.0);
    }

    #[test]
    fn snapshot_fractions_follow_duration() {
        let snapshot = ProgressSnapshot {
            position_secs: 150.0,
            buffered_end_secs: 300.0,
            duration_secs: Some(600.0),
        };
        assert_abs_diff_eq!(snapshot.progress_fraction(), 0.25);
        assert_abs_diff_eq!(snapshot.buffered_fraction(), 0.5);
    }

    #[test]
    fn snapshot_fractions_are_zero_without_duration() {
        let snapshot = ProgressSnapshot {
            position_secs: 150.0,
            buffered_end_secs: 300.0,
            duration_secs: None,
        };
        assert_eq!(snapshot.progress_fraction(), 0.0);
        assert_eq!(snapshot.buffered_fraction(), 0.0);
    }
}
