// SPDX-License-Identifier: MPL-2.0
//! Deterministic model of the host's media element.
//!
//! The crate never touches a real decoder or audio device. Instead the
//! embedding host mirrors its platform element into this model: commands
//! (`load`, `play`, `set_current_time`, ...) flow in from the session, and
//! the host reports what actually happened through the report surface
//! (`finish_loading`, `advance`, `complete_seek`, `begin_stall`, `fail`).
//!
//! Keeping the element as a plain state machine makes every playback rule
//! in this crate testable without a display or network:
//! - Seeks are asynchronous: `set_current_time` records a pending target
//!   and the reported time only moves once the host calls `complete_seek`.
//! - Time only advances while playing, unstalled, and not mid-seek.
//! - A reported failure is terminal for the loaded source; only a new
//!   `load` clears it.

use std::fmt;

/// Why the element cannot play its source.
///
/// Mirrors the platform media error codes: fetch aborted, network failure,
/// decode failure, or an unsupported source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementError {
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::Aborted => write!(f, "Source fetch was aborted"),
            ElementError::Network => write!(f, "Network failure while fetching source"),
            ElementError::Decode => write!(f, "Stream data could not be decoded"),
            ElementError::SrcNotSupported => write!(f, "Source format is not supported"),
        }
    }
}

/// Notifications the element emits for the session to drain.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// Metadata for the current source finished loading; duration is known.
    MetadataLoaded { duration_secs: f64 },

    /// A pending seek was applied; the reported time now matches the target.
    Seeked { position_secs: f64 },

    /// Playback reached the end of the stream.
    Ended,

    /// The decode pipeline ran out of data mid-playback.
    Stalled,

    /// Data arrived again after a stall.
    StallRecovered,

    /// A fatal element error; the loaded source is unplayable.
    Failed(ElementError),
}

/// Media element state machine.
///
/// Exclusively owned by one playback session. The session issues commands;
/// the embedding host feeds back reports. All reads the UI performs go
/// through the session, never directly through this type.
#[derive(Debug)]
pub struct MediaElement {
    source_url: Option<String>,
    current_time_secs: f64,
    /// Seek target not yet applied by the host.
    pending_seek_secs: Option<f64>,
    /// Known once metadata has loaded for the current source.
    duration_secs: Option<f64>,
    paused: bool,
    volume: f32,
    muted: bool,
    buffered_end_secs: f64,
    stalled: bool,
    error: Option<ElementError>,
    events: Vec<ElementEvent>,
}

impl MediaElement {
    /// Creates an idle element with no source loaded.
    pub fn new() -> Self {
        Self {
            source_url: None,
            current_time_secs: 0.0,
            pending_seek_secs: None,
            duration_secs: None,
            paused: true,
            volume: 1.0,
            muted: false,
            buffered_end_secs: 0.0,
            stalled: false,
            error: None,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Command surface (driven by the session)
    // =========================================================================

    /// Loads a new source URL.
    ///
    /// Resets playback progress, buffered range, stall and error state.
    /// Pending events from the previous source are dropped; they no longer
    /// describe anything observable.
    pub fn load(&mut self, url: &str) {
        self.source_url = Some(url.to_string());
        self.current_time_secs = 0.0;
        self.pending_seek_secs = None;
        self.duration_secs = None;
        self.paused = true;
        self.buffered_end_secs = 0.0;
        self.stalled = false;
        self.error = None;
        self.events.clear();
    }

    /// Starts playback. Ignored without a source or after a failure.
    pub fn play(&mut self) {
        if self.source_url.is_some() && self.error.is_none() {
            self.paused = false;
        }
    }

    /// Pauses playback.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Requests a seek to `target_secs`.
    ///
    /// With metadata loaded the target is clamped to `[0, duration]` and
    /// recorded as pending; the reported time moves when the host calls
    /// [`MediaElement::complete_seek`]. Before metadata the value is applied
    /// directly (initial position restore) and re-clamped once the duration
    /// becomes known.
    pub fn set_current_time(&mut self, target_secs: f64) {
        match self.duration_secs {
            Some(duration) => {
                self.pending_seek_secs = Some(target_secs.max(0.0).min(duration));
            }
            None => {
                self.current_time_secs = target_secs.max(0.0);
            }
        }
    }

    /// Sets the output volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Sets the mute flag. Volume is preserved.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    // =========================================================================
    // Report surface (driven by the embedding host)
    // =========================================================================

    /// Reports that metadata for the current source finished loading.
    ///
    /// Applies any position set before metadata, clamped to the now-known
    /// duration. Ignored without a source or after a failure.
    pub fn finish_loading(&mut self, duration_secs: f64) {
        if self.source_url.is_none() || self.error.is_some() {
            return;
        }
        let duration = duration_secs.max(0.0);
        self.duration_secs = Some(duration);
        if let Some(pending) = self.pending_seek_secs.take() {
            self.current_time_secs = pending.max(0.0).min(duration);
        }
        self.current_time_secs = self.current_time_secs.min(duration);
        self.stalled = false;
        self.events.push(ElementEvent::MetadataLoaded {
            duration_secs: duration,
        });
    }

    /// Reports a fatal error for the current source.
    pub fn fail(&mut self, error: ElementError) {
        self.error = Some(error);
        self.paused = true;
        self.stalled = false;
        self.pending_seek_secs = None;
        self.events.push(ElementEvent::Failed(error));
    }

    /// Reports that the pending seek was applied.
    pub fn complete_seek(&mut self) {
        if let Some(target) = self.pending_seek_secs.take() {
            self.current_time_secs = target;
            self.buffered_end_secs = self.buffered_end_secs.max(target);
            self.events.push(ElementEvent::Seeked {
                position_secs: target,
            });
        }
    }

    /// Reports wall-clock playback progress.
    ///
    /// Time only moves while playing with metadata, unstalled, unfailed and
    /// not mid-seek. Reaching the duration pauses the element and emits
    /// [`ElementEvent::Ended`].
    pub fn advance(&mut self, dt_secs: f64) {
        if self.paused || self.stalled || self.error.is_some() || self.pending_seek_secs.is_some() {
            return;
        }
        let Some(duration) = self.duration_secs else {
            return;
        };

        let next = (self.current_time_secs + dt_secs.max(0.0)).min(duration);
        self.current_time_secs = next;
        self.buffered_end_secs = self.buffered_end_secs.max(next);

        if next >= duration {
            self.paused = true;
            self.events.push(ElementEvent::Ended);
        }
    }

    /// Reports that the decode pipeline ran dry.
    pub fn begin_stall(&mut self) {
        if self.error.is_none() && !self.stalled {
            self.stalled = true;
            self.events.push(ElementEvent::Stalled);
        }
    }

    /// Reports that data arrived again after a stall.
    pub fn resolve_stall(&mut self) {
        if self.stalled {
            self.stalled = false;
            self.events.push(ElementEvent::StallRecovered);
        }
    }

    /// Reports how far ahead of the playhead data is buffered.
    pub fn set_buffered_to(&mut self, buffered_end_secs: f64) {
        let mut end = buffered_end_secs.max(0.0);
        if let Some(duration) = self.duration_secs {
            end = end.min(duration);
        }
        self.buffered_end_secs = end;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn current_time_secs(&self) -> f64 {
        self.current_time_secs
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// Whether metadata for the current source has loaded.
    pub fn has_metadata(&self) -> bool {
        self.duration_secs.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a seek is pending host application.
    pub fn is_seeking(&self) -> bool {
        self.pending_seek_secs.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn buffered_end_secs(&self) -> f64 {
        self.buffered_end_secs
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn error(&self) -> Option<ElementError> {
        self.error
    }

    /// Drains queued element events, oldest first.
    pub fn take_events(&mut self) -> Vec<ElementEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for MediaElement {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_element(duration_secs: f64) -> MediaElement {
        let mut element = MediaElement::new();
        element.load("http://cdn/video");
        element.finish_loading(duration_secs);
        element.take_events();
        element
    }

    #[test]
    fn new_element_is_idle_and_paused() {
        let element = MediaElement::new();

        assert!(element.source_url().is_none());
        assert!(element.is_paused());
        assert!(!element.has_metadata());
        assert_eq!(element.current_time_secs(), 0.0);
        assert_eq!(element.buffered_end_secs(), 0.0);
    }

    #[test]
    fn load_sets_source_and_resets_progress() {
        let mut element = loaded_element(300.0);
        element.play();
        element.advance(10.0);

        element.load("http://cdn/other");

        assert_eq!(element.source_url(), Some("http://cdn/other"));
        assert_eq!(element.current_time_secs(), 0.0);
        assert!(!element.has_metadata());
        assert!(element.is_paused());
        assert!(element.take_events().is_empty());
    }

    #[test]
    fn play_without_source_stays_paused() {
        let mut element = MediaElement::new();
        element.play();
        assert!(element.is_paused());
    }

    #[test]
    fn advance_requires_metadata() {
        let mut element = MediaElement::new();
        element.load("http://cdn/video");
        element.play();

        element.advance(5.0);

        assert_eq!(element.current_time_secs(), 0.0);
    }

    #[test]
    fn finish_loading_reports_metadata() {
        let mut element = MediaElement::new();
        element.load("http://cdn/video");

        element.finish_loading(300.0);

        assert!(element.has_metadata());
        assert_eq!(element.duration_secs(), Some(300.0));
        assert_eq!(
            element.take_events(),
            vec![ElementEvent::MetadataLoaded {
                duration_secs: 300.0
            }]
        );
    }

    #[test]
    fn advance_moves_time_and_buffered_range() {
        let mut element = loaded_element(300.0);
        element.play();

        element.advance(12.5);

        assert_eq!(element.current_time_secs(), 12.5);
        assert_eq!(element.buffered_end_secs(), 12.5);
    }

    #[test]
    fn advance_stops_at_duration_and_fires_ended() {
        let mut element = loaded_element(30.0);
        element.play();

        element.advance(100.0);

        assert_eq!(element.current_time_secs(), 30.0);
        assert!(element.is_paused());
        assert_eq!(element.take_events(), vec![ElementEvent::Ended]);
    }

    #[test]
    fn seek_is_pending_until_host_completes_it() {
        let mut element = loaded_element(300.0);

        element.set_current_time(120.0);
        assert!(element.is_seeking());
        assert_eq!(element.current_time_secs(), 0.0);

        element.complete_seek();
        assert!(!element.is_seeking());
        assert_eq!(element.current_time_secs(), 120.0);
        assert_eq!(
            element.take_events(),
            vec![ElementEvent::Seeked {
                position_secs: 120.0
            }]
        );
    }

    #[test]
    fn seek_targets_clamp_to_duration() {
        let mut element = loaded_element(300.0);

        element.set_current_time(500.0);
        element.complete_seek();
        assert_eq!(element.current_time_secs(), 300.0);

        element.set_current_time(-5.0);
        element.complete_seek();
        assert_eq!(element.current_time_secs(), 0.0);
    }

    #[test]
    fn advance_halts_while_seek_is_pending() {
        let mut element = loaded_element(300.0);
        element.play();
        element.set_current_time(60.0);

        element.advance(5.0);

        assert_eq!(element.current_time_secs(), 0.0);
        element.complete_seek();
        assert_eq!(element.current_time_secs(), 60.0);
    }

    #[test]
    fn position_set_before_metadata_applies_directly_then_clamps() {
        let mut element = MediaElement::new();
        element.load("http://cdn/video");

        element.set_current_time(500.0);
        assert_eq!(element.current_time_secs(), 500.0);

        element.finish_loading(300.0);
        assert_eq!(element.current_time_secs(), 300.0);
    }

    #[test]
    fn stall_blocks_advance_until_recovered() {
        let mut element = loaded_element(300.0);
        element.play();
        element.advance(10.0);

        element.begin_stall();
        element.advance(10.0);
        assert_eq!(element.current_time_secs(), 10.0);
        assert!(element.is_stalled());

        element.resolve_stall();
        element.advance(10.0);
        assert_eq!(element.current_time_secs(), 20.0);

        assert_eq!(
            element.take_events(),
            vec![ElementEvent::Stalled, ElementEvent::StallRecovered]
        );
    }

    #[test]
    fn begin_stall_is_idempotent() {
        let mut element = loaded_element(300.0);
        element.begin_stall();
        element.begin_stall();

        assert_eq!(element.take_events(), vec![ElementEvent::Stalled]);
    }

    #[test]
    fn fail_makes_element_inert() {
        let mut element = loaded_element(300.0);
        element.play();
        element.fail(ElementError::Decode);

        element.play();
        assert!(element.is_paused());

        element.advance(10.0);
        assert_eq!(element.current_time_secs(), 0.0);

        assert_eq!(element.error(), Some(ElementError::Decode));
        assert_eq!(
            element.take_events(),
            vec![ElementEvent::Failed(ElementError::Decode)]
        );
    }

    #[test]
    fn load_clears_previous_failure() {
        let mut element = loaded_element(300.0);
        element.fail(ElementError::Network);

        element.load("http://cdn/retry");

        assert!(element.error().is_none());
        element.finish_loading(120.0);
        element.play();
        assert!(!element.is_paused());
    }

    #[test]
    fn volume_and_mute_round_trip() {
        let mut element = MediaElement::new();

        element.set_volume(0.7);
        assert_eq!(element.volume(), 0.7);

        element.set_volume(2.0);
        assert_eq!(element.volume(), 1.0);

        element.set_muted(true);
        assert!(element.is_muted());
        assert_eq!(element.volume(), 1.0);
    }

    #[test]
    fn buffered_range_clamps_to_duration() {
        let mut element = loaded_element(300.0);

        element.set_buffered_to(500.0);
        assert_eq!(element.buffered_end_secs(), 300.0);

        element.set_buffered_to(42.0);
        assert_eq!(element.buffered_end_secs(), 42.0);
    }

    #[test]
    fn take_events_drains_queue() {
        let mut element = MediaElement::new();
        element.load("http://cdn/video");
        element.finish_loading(10.0);

        assert_eq!(element.take_events().len(), 1);
        assert!(element.take_events().is_empty());
    }
}
