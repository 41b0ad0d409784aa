// SPDX-License-Identifier: MPL-2.0
//! Playback session state machine.
//!
//! [`PlayerSession`] is the single source of truth for one piece of content:
//! it exclusively owns the [`MediaElement`], applies every command to it, and
//! re-derives its own state from what the element reports back. Widgets and
//! keybinds never touch the element directly.
//!
//! The session also runs the quality/subtitle switch protocol: a quality
//! switch captures `(position, is_playing)`, swaps the source, and restores
//! both once the new source's metadata arrives. A failed switch reverts to
//! the prior quality; a failed revert is terminal.

use std::time::{Duration, Instant};

use super::element::{ElementError, ElementEvent, MediaElement};
use super::events::PlayerEvent;
use super::volume::Volume;
use crate::config::defaults;
use crate::source::{ContentId, MediaType, SourceSet};

/// Session-level playback state.
///
/// State transitions:
/// - `Loading` -> `Playing` or `Paused` when metadata arrives (depending on
///   whether play was requested while loading)
/// - `Playing` -> `Paused` (pause), `Ended` (playhead reaches duration),
///   `Stalled` (decode starved), `Unplayable` (element failure)
/// - `Paused` -> `Playing`, `Stalled`, `Unplayable`
/// - `Stalled` -> `Playing` or `Paused` when data arrives, honoring the
///   captured resume intent
/// - `Ended` -> `Playing` (play restarts from the beginning), `Paused`
///   (seeking away from the end)
/// - `Unplayable` is terminal; only a new session leaves it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// Waiting for the active source's metadata.
    Loading,
    Playing,
    Paused,
    /// The playhead reached the end of the stream.
    Ended,
    /// Decode starved mid-playback. Clears on its own when data arrives;
    /// `resume_playing` is whether playback resumes then.
    Stalled { resume_playing: bool },
    /// The source cannot be played. Terminal for the session.
    Unplayable,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    /// True while playing or while a stall will resume playback.
    pub fn is_playing_or_will_resume(&self) -> bool {
        matches!(
            self,
            PlaybackState::Playing
                | PlaybackState::Stalled {
                    resume_playing: true
                }
        )
    }

    pub fn is_stalled(&self) -> bool {
        matches!(self, PlaybackState::Stalled { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PlaybackState::Loading)
    }

    /// True once the session can never play again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackState::Unplayable)
    }
}

/// Captured context for a source swap in flight.
#[derive(Debug, Clone, Copy)]
struct PendingSwitch {
    /// Quality index the session is switching to.
    target_index: usize,
    /// Quality index to revert to if the new source fails.
    prior_index: usize,
    /// Position to restore once the new source's metadata arrives.
    resume_secs: f64,
    resume_playing: bool,
    /// Set while loading the prior quality after a failed switch. A failure
    /// during a revert leaves no working source to fall back to.
    reverting: bool,
}

/// A seek issued to the element and not yet acknowledged by the host.
#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target_secs: f64,
    issued_at: Instant,
}

/// Playback controller for one content item.
///
/// Created when the player mounts for a title, discarded on teardown.
/// Mutations queue [`PlayerEvent`]s in the order they occur; the embedding
/// component drains them with [`PlayerSession::take_events`].
#[derive(Debug)]
pub struct PlayerSession {
    content_id: ContentId,
    media_type: MediaType,
    sources: SourceSet,
    element: MediaElement,
    state: PlaybackState,
    active_quality: usize,
    active_subtitle: Option<usize>,
    volume: Volume,
    muted: bool,
    /// Play as soon as the pending load finishes.
    play_when_ready: bool,
    pending_switch: Option<PendingSwitch>,
    pending_seek: Option<PendingSeek>,
    /// Seek requested while a switch was in flight. Replaces the captured
    /// resume position when the switch completes; latest request wins.
    deferred_seek_secs: Option<f64>,
    switch_failures: u32,
    fullscreen: bool,
    picture_in_picture: bool,
    quality_menu_open: bool,
    subtitle_menu_open: bool,
    events: Vec<PlayerEvent>,
    torn_down: bool,
}

impl PlayerSession {
    /// Creates a session and starts loading the default quality (index 0).
    pub fn new(content_id: ContentId, media_type: MediaType, sources: SourceSet) -> Self {
        let mut element = MediaElement::new();
        if let Some(url) = sources.url_at(0) {
            element.load(url);
        }
        Self {
            content_id,
            media_type,
            sources,
            element,
            state: PlaybackState::Loading,
            active_quality: 0,
            active_subtitle: None,
            volume: Volume::default(),
            muted: false,
            play_when_ready: false,
            pending_switch: None,
            pending_seek: None,
            deferred_seek_secs: None,
            switch_failures: 0,
            fullscreen: false,
            picture_in_picture: false,
            quality_menu_open: false,
            subtitle_menu_open: false,
            events: Vec::new(),
            torn_down: false,
        }
    }

    /// Seeds position and volume from a stored record.
    ///
    /// Call once, before the source's metadata arrives; the position is
    /// clamped against the real duration when it becomes known. Ignored once
    /// metadata has loaded, to avoid fighting live playback.
    pub fn seed_resume(&mut self, position_secs: f64, volume: f32) {
        if self.torn_down || self.element.has_metadata() {
            return;
        }
        self.element.set_current_time(position_secs);
        self.set_volume(volume);
    }

    // =========================================================================
    // Playback commands
    // =========================================================================

    /// Starts or resumes playback. From `Ended`, restarts at the beginning.
    pub fn play(&mut self) {
        if self.torn_down || self.state.is_terminal() {
            return;
        }
        if let Some(switch) = self.pending_switch.as_mut() {
            switch.resume_playing = true;
            self.set_state(PlaybackState::Playing);
            return;
        }
        match self.state {
            PlaybackState::Loading => {
                self.play_when_ready = true;
                self.element.play();
            }
            PlaybackState::Ended => {
                self.element.set_current_time(0.0);
                if self.element.has_metadata() {
                    self.pending_seek = Some(PendingSeek {
                        target_secs: 0.0,
                        issued_at: Instant::now(),
                    });
                }
                self.element.play();
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Stalled { resume_playing } => {
                if !resume_playing {
                    self.set_state(PlaybackState::Stalled {
                        resume_playing: true,
                    });
                }
            }
            _ => {
                self.element.play();
                self.rederive_state();
            }
        }
    }

    /// Pauses playback. During a stall, clears the resume intent instead.
    pub fn pause(&mut self) {
        if self.torn_down || self.state.is_terminal() {
            return;
        }
        self.play_when_ready = false;
        if let Some(switch) = self.pending_switch.as_mut() {
            switch.resume_playing = false;
            self.set_state(PlaybackState::Paused);
            return;
        }
        self.element.pause();
        match self.state {
            PlaybackState::Stalled { resume_playing } => {
                if resume_playing {
                    self.set_state(PlaybackState::Stalled {
                        resume_playing: false,
                    });
                }
            }
            _ => self.rederive_state(),
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing_or_will_resume() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seeks to `secs`, clamped to `[0, duration]`.
    ///
    /// Out-of-range targets are clamped silently; they are user gestures,
    /// not errors. While a quality switch is in flight the seek is deferred
    /// and reapplied against the new source once the switch completes.
    pub fn seek_to(&mut self, secs: f64) {
        if self.torn_down || self.state.is_terminal() {
            return;
        }
        if self.pending_switch.is_some() {
            self.deferred_seek_secs = Some(secs);
            return;
        }
        let target = match self.element.duration_secs() {
            Some(duration) => secs.max(0.0).min(duration),
            None => secs.max(0.0),
        };
        self.element.set_current_time(target);
        if self.element.has_metadata() {
            self.pending_seek = Some(PendingSeek {
                target_secs: target,
                issued_at: Instant::now(),
            });
        }
    }

    /// Seeks relative to the current position (skip buttons, arrow keys).
    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek_to(self.position_secs() + delta_secs);
    }

    /// Sets the volume, clamped to `[0, 1]`. Mute is left untouched.
    pub fn set_volume(&mut self, volume: f32) {
        if self.torn_down {
            return;
        }
        self.volume = Volume::new(volume);
        self.element.set_volume(self.volume.value());
        self.events.push(PlayerEvent::VolumeChanged {
            volume: self.volume.value(),
            muted: self.muted,
        });
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.increase().value());
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.volume.decrease().value());
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.torn_down || muted == self.muted {
            return;
        }
        self.muted = muted;
        self.element.set_muted(muted);
        self.events.push(PlayerEvent::VolumeChanged {
            volume: self.volume.value(),
            muted,
        });
    }

    // =========================================================================
    // Quality / subtitle switching
    // =========================================================================

    /// Switches the active quality, preserving position and play state.
    ///
    /// Captures `(position, is_playing)`, swaps the source, and restores both
    /// once the new source's metadata arrives. Switching to the already
    /// active index is a no-op and reloads nothing. If a seek was still
    /// unacknowledged when the switch started, its target is what gets
    /// restored, so a committed scrub survives the switch.
    pub fn switch_quality(&mut self, index: usize) {
        if self.torn_down || self.state.is_terminal() {
            return;
        }
        if !self.sources.has_quality_menu() {
            return;
        }
        if self.pending_switch.is_some() {
            eprintln!("[WARN] Quality switch requested while another is in flight; ignored");
            return;
        }
        if index == self.active_quality {
            return;
        }
        let Some(url) = self.sources.url_at(index).map(str::to_string) else {
            eprintln!("[WARN] Quality switch to out-of-range index {} ignored", index);
            return;
        };

        let resume_secs = self.position_secs();
        let resume_playing = self.is_playing_or_will_resume();
        self.pending_switch = Some(PendingSwitch {
            target_index: index,
            prior_index: self.active_quality,
            resume_secs,
            resume_playing,
            reverting: false,
        });
        self.active_quality = index;
        self.pending_seek = None;
        self.element.load(&url);
    }

    /// Switches the active subtitle track; `None` disables subtitles.
    ///
    /// Never touches playback position or play state.
    pub fn switch_subtitle(&mut self, index: Option<usize>) {
        if self.torn_down || self.state.is_terminal() {
            return;
        }
        if let Some(i) = index {
            if i >= self.sources.subtitle_tracks().len() {
                return;
            }
        }
        if index == self.active_subtitle {
            return;
        }
        self.active_subtitle = index;
        self.events.push(PlayerEvent::SubtitleChanged { index });
    }

    // =========================================================================
    // Host window intents and menu flags
    // =========================================================================

    /// Flips the fullscreen intent. The host performs the actual windowing.
    pub fn toggle_fullscreen(&mut self) {
        if self.torn_down {
            return;
        }
        self.fullscreen = !self.fullscreen;
        self.events.push(PlayerEvent::FullscreenToggled {
            fullscreen: self.fullscreen,
        });
    }

    /// Flips the picture-in-picture intent.
    pub fn toggle_picture_in_picture(&mut self) {
        if self.torn_down {
            return;
        }
        self.picture_in_picture = !self.picture_in_picture;
        self.events.push(PlayerEvent::PictureInPictureToggled {
            active: self.picture_in_picture,
        });
    }

    /// Opens or closes the quality menu. The two menus are exclusive.
    pub fn toggle_quality_menu(&mut self) {
        self.quality_menu_open = !self.quality_menu_open;
        if self.quality_menu_open {
            self.subtitle_menu_open = false;
        }
    }

    /// Opens or closes the subtitle menu. The two menus are exclusive.
    pub fn toggle_subtitle_menu(&mut self) {
        self.subtitle_menu_open = !self.subtitle_menu_open;
        if self.subtitle_menu_open {
            self.quality_menu_open = false;
        }
    }

    pub fn close_menus(&mut self) {
        self.quality_menu_open = false;
        self.subtitle_menu_open = false;
    }

    // =========================================================================
    // Element synchronization
    // =========================================================================

    /// Drains element reports and re-derives session state.
    ///
    /// Drive this on every tick and after every batch of host reports. The
    /// session never trusts its own copy of element state across a tick;
    /// the element's reported state wins. `now` feeds the seek
    /// acknowledgement timeout.
    pub fn poll(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        for event in self.element.take_events() {
            match event {
                ElementEvent::MetadataLoaded { duration_secs } => {
                    self.on_metadata_loaded(duration_secs, now);
                }
                ElementEvent::Seeked { position_secs } => self.on_seeked(position_secs),
                ElementEvent::Ended => {
                    self.pending_seek = None;
                    self.set_state(PlaybackState::Ended);
                }
                ElementEvent::Stalled => self.on_stalled(),
                ElementEvent::StallRecovered => self.on_stall_recovered(),
                ElementEvent::Failed(error) => self.on_failed(error),
            }
        }

        // Stop tracking a seek the host never acknowledged, so the UI cannot
        // stay pinned to a target the element will never reach.
        if let Some(pending) = self.pending_seek {
            let timeout = Duration::from_millis(defaults::SEEK_ACK_TIMEOUT_MILLIS);
            if now.saturating_duration_since(pending.issued_at) >= timeout {
                self.pending_seek = None;
            }
        }

        // While a switch is in flight the pre-switch state stays frozen; the
        // element is mid-load and its flags describe nothing user-visible.
        if self.pending_switch.is_none() {
            self.rederive_state();
        }
    }

    fn on_metadata_loaded(&mut self, duration_secs: f64, now: Instant) {
        if let Some(switch) = self.pending_switch.take() {
            let target = self.deferred_seek_secs.take().unwrap_or(switch.resume_secs);
            let target = target.max(0.0).min(duration_secs);
            self.element.set_current_time(target);
            self.pending_seek = Some(PendingSeek {
                target_secs: target,
                issued_at: now,
            });
            self.play_when_ready = false;
            if switch.resume_playing {
                self.element.play();
                self.set_state(PlaybackState::Playing);
            } else {
                self.element.pause();
                self.set_state(PlaybackState::Paused);
            }
            self.events.push(PlayerEvent::QualityChanged {
                index: self.active_quality,
            });
            return;
        }

        self.events.push(PlayerEvent::MetadataLoaded { duration_secs });
        if self.play_when_ready {
            self.play_when_ready = false;
            self.element.play();
            self.set_state(PlaybackState::Playing);
        } else {
            self.element.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    fn on_seeked(&mut self, position_secs: f64) {
        self.pending_seek = None;
        self.events.push(PlayerEvent::SeekCompleted { position_secs });
        // Seeking away from the end leaves Ended.
        if matches!(self.state, PlaybackState::Ended) {
            if let Some(duration) = self.element.duration_secs() {
                if position_secs < duration {
                    self.set_state(PlaybackState::Paused);
                }
            }
        }
    }

    fn on_stalled(&mut self) {
        if matches!(
            self.state,
            PlaybackState::Loading | PlaybackState::Ended | PlaybackState::Unplayable
        ) {
            return;
        }
        let resume_playing = self.is_playing_or_will_resume();
        self.set_state(PlaybackState::Stalled { resume_playing });
    }

    fn on_stall_recovered(&mut self) {
        if let PlaybackState::Stalled { resume_playing } = self.state {
            if resume_playing {
                self.element.play();
                self.set_state(PlaybackState::Playing);
            } else {
                self.element.pause();
                self.set_state(PlaybackState::Paused);
            }
        }
    }

    fn on_failed(&mut self, error: ElementError) {
        self.pending_seek = None;
        let Some(switch) = self.pending_switch.take() else {
            eprintln!("[WARN] Media element failed: {}", error);
            self.set_state(PlaybackState::Unplayable);
            return;
        };

        if switch.reverting {
            eprintln!(
                "[WARN] Revert to quality index {} failed too: {}",
                switch.prior_index, error
            );
            self.set_state(PlaybackState::Unplayable);
            return;
        }

        // Fail closed: go back to the source that was working.
        self.switch_failures += 1;
        eprintln!(
            "[WARN] Quality switch to index {} failed: {}; reverting to index {}",
            switch.target_index, error, switch.prior_index
        );
        self.events.push(PlayerEvent::QualitySwitchFailed {
            attempted_index: switch.target_index,
            recurring: self.switch_failures >= 2,
        });
        self.active_quality = switch.prior_index;
        match self.sources.url_at(switch.prior_index).map(str::to_string) {
            Some(url) => {
                self.pending_switch = Some(PendingSwitch {
                    target_index: switch.prior_index,
                    prior_index: switch.prior_index,
                    resume_secs: switch.resume_secs,
                    resume_playing: switch.resume_playing,
                    reverting: true,
                });
                self.element.load(&url);
            }
            None => self.set_state(PlaybackState::Unplayable),
        }
    }

    /// Re-reads the element and moves between `Playing` and `Paused` when
    /// the element disagrees. The other states only change through their
    /// dedicated transitions.
    fn rederive_state(&mut self) {
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            let derived = if self.element.is_paused() {
                PlaybackState::Paused
            } else {
                PlaybackState::Playing
            };
            self.set_state(derived);
        }
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.state != next {
            self.state = next;
            self.events.push(PlayerEvent::StateChanged { state: next });
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Marks the session dead: later commands, reports and polls are ignored.
    ///
    /// Call when the player unmounts; results of anything still in flight
    /// are discarded from here on.
    pub fn tear_down(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.element.pause();
        self.pending_switch = None;
        self.pending_seek = None;
        self.deferred_seek_secs = None;
        self.events.clear();
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while playing, or while an interruption (stall, switch, load)
    /// will resume playback once it clears.
    pub fn is_playing_or_will_resume(&self) -> bool {
        self.play_when_ready || self.state.is_playing_or_will_resume()
    }

    /// The position the UI should display, in seconds.
    ///
    /// While a switch or an unacknowledged seek is in flight this is the
    /// position the session is moving to, not the element's stale time.
    pub fn position_secs(&self) -> f64 {
        if let Some(switch) = &self.pending_switch {
            return self.deferred_seek_secs.unwrap_or(switch.resume_secs);
        }
        if let Some(pending) = &self.pending_seek {
            return pending.target_secs;
        }
        self.element.current_time_secs()
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.element.duration_secs()
    }

    pub fn buffered_end_secs(&self) -> f64 {
        self.element.buffered_end_secs()
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn active_quality(&self) -> usize {
        self.active_quality
    }

    pub fn active_subtitle(&self) -> Option<usize> {
        self.active_subtitle
    }

    /// Whether a quality switch is waiting for the new source.
    pub fn is_switching(&self) -> bool {
        self.pending_switch.is_some()
    }

    /// Whether a seek is waiting for the host acknowledgement.
    pub fn is_seek_pending(&self) -> bool {
        self.pending_seek.is_some()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_picture_in_picture(&self) -> bool {
        self.picture_in_picture
    }

    pub fn quality_menu_open(&self) -> bool {
        self.quality_menu_open
    }

    pub fn subtitle_menu_open(&self) -> bool {
        self.subtitle_menu_open
    }

    /// Drains queued session events, in mutation order.
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read access to the owned element, for display-only queries.
    pub fn element(&self) -> &MediaElement {
        &self.element
    }

    /// Report surface for the embedding backend.
    ///
    /// The host mirrors its platform element's callbacks here (metadata
    /// loaded, time advanced, seek applied, stall, failure) and then calls
    /// [`PlayerSession::poll`]. Widgets and controllers never use this;
    /// they go through the session's commands.
    pub fn element_mut(&mut self) -> &mut MediaElement {
        &mut self.element
    }
}
