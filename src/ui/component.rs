// SPDX-License-Identifier: MPL-2.0
//! Embeddable player component.
//!
//! Wires the playback session, scrub gesture, progress readout, control
//! visibility, keybinds, and resume persistence into one update/view unit
//! that a host application embeds as a screen or pane.

use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::persist::{PlaybackRecord, ResumeStore, SaveThrottle};
use crate::player::{
    keybinds, PlayerAction, PlayerEvent, PlayerSession, ProgressReadout, ProgressSnapshot,
    ScrubController, VisibilityController,
};
use crate::source::{ContentId, MediaType, SourceSet};
use crate::ui::controls;
use iced::widget::Space;
use iced::{event, mouse, Element, Length};
use std::path::PathBuf;
use std::time::Instant;

/// Messages handled by the player component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A control bar widget was used.
    Controls(controls::Message),

    /// A keybind resolved to a player action.
    Action(PlayerAction),

    /// The pointer moved somewhere over the player.
    PointerMoved,

    /// Fixed-cadence driver for element polling, progress refresh,
    /// auto-hide, and throttled persistence.
    Tick,
}

/// Effects the host application must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// No effect.
    None,
    /// Host should apply this fullscreen state to its window.
    SetFullscreen(bool),
    /// Host should enter or leave picture-in-picture.
    SetPictureInPicture(bool),
    /// Host should show a notification; the payload is a translation key.
    Notify(String),
}

/// Player component state.
///
/// Owns the media element exclusively through the session. The host reaches
/// the element only through [`PlayerComponent::session_mut`], which is the
/// surface for delivering element reports (metadata, seek completion,
/// stalls, failures).
pub struct PlayerComponent {
    session: PlayerSession,
    scrub: ScrubController,
    readout: ProgressReadout,
    visibility: VisibilityController,
    resume: ResumeStore,
    save_throttle: SaveThrottle,
    seek_step_secs: f64,
    /// Storage directory override, None for the platform default.
    data_dir: Option<PathBuf>,
}

impl PlayerComponent {
    /// Creates a component for one content item and loads its resume record.
    ///
    /// A stored position and volume seed the session before metadata
    /// arrives; otherwise the configured defaults apply. Returns a
    /// notification key alongside the component when the resume store could
    /// not be read.
    pub fn new(
        content_id: ContentId,
        media_type: MediaType,
        sources: SourceSet,
        config: &Config,
        data_dir: Option<PathBuf>,
    ) -> (Self, Option<String>) {
        let (resume, warning) = ResumeStore::load_from(data_dir.clone());

        let mut session = PlayerSession::new(content_id, media_type, sources);
        match resume.load_for(session.media_type(), session.content_id()) {
            Some(record) => session.seed_resume(record.position_secs, record.volume),
            None => session.set_volume(config.effective_volume()),
        }
        if config.starts_muted() {
            session.set_muted(true);
        }
        // Construction-time volume events are of no interest to the host.
        let _ = session.take_events();

        let component = Self {
            session,
            scrub: ScrubController::new(),
            readout: ProgressReadout::new(),
            visibility: VisibilityController::new(config.hide_delay()),
            resume,
            save_throttle: SaveThrottle::new(config.save_interval()),
            seek_step_secs: config.seek_step_secs(),
            data_dir,
        };
        (component, warning)
    }

    /// Subscriptions driving the component: the fixed-cadence tick plus the
    /// runtime event stream for keybinds and pointer activity.
    pub fn subscription(&self) -> iced::Subscription<Message> {
        let tick = iced::time::every(std::time::Duration::from_millis(
            config::PROGRESS_REFRESH_MILLIS,
        ))
        .map(|_| Message::Tick);

        let events = event::listen_with(|event, status, _window| match &event {
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => Some(Message::PointerMoved),
            _ => keybinds::dispatch(&event, status).map(Message::Action),
        });

        iced::Subscription::batch([tick, events])
    }

    /// Handles a component message.
    pub fn handle(&mut self, message: Message) -> Effect {
        self.handle_at(message, Instant::now())
    }

    fn handle_at(&mut self, message: Message, now: Instant) -> Effect {
        match message {
            Message::Controls(message) => self.handle_controls(message, now),
            Message::Action(action) => {
                self.visibility.record_activity(now);
                self.apply_action(action);
                self.drain_session_events()
            }
            Message::PointerMoved => {
                self.visibility.record_activity(now);
                Effect::None
            }
            Message::Tick => self.tick(now),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn handle_controls(&mut self, message: controls::Message, now: Instant) -> Effect {
        self.visibility.record_activity(now);
        match message {
            controls::Message::TogglePlayback => self.session.toggle_play(),
            controls::Message::SeekPreview(secs) => {
                // Preview only; playback is not touched until release.
                let duration = self.session.duration_secs().unwrap_or(0.0);
                self.scrub.preview_to(secs, duration);
            }
            controls::Message::SeekCommit => {
                if let Some(target_secs) = self.scrub.release(now) {
                    self.session.seek_to(target_secs);
                }
            }
            controls::Message::SkipBackward => self.session.seek_by(-self.seek_step_secs),
            controls::Message::SkipForward => self.session.seek_by(self.seek_step_secs),
            controls::Message::SetVolume(volume) => self.session.set_volume(volume),
            controls::Message::ToggleMute => self.session.toggle_mute(),
            controls::Message::ToggleQualityMenu => self.session.toggle_quality_menu(),
            controls::Message::ToggleSubtitleMenu => self.session.toggle_subtitle_menu(),
            controls::Message::SelectQuality(index) => {
                self.session.switch_quality(index);
                self.session.close_menus();
            }
            controls::Message::SelectSubtitle(index) => {
                self.session.switch_subtitle(index);
                self.session.close_menus();
            }
            controls::Message::ToggleFullscreen => self.session.toggle_fullscreen(),
            controls::Message::TogglePictureInPicture => self.session.toggle_picture_in_picture(),
        }
        self.drain_session_events()
    }

    fn apply_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::TogglePlay => self.session.toggle_play(),
            PlayerAction::SeekBackward => self.session.seek_by(-self.seek_step_secs),
            PlayerAction::SeekForward => self.session.seek_by(self.seek_step_secs),
            PlayerAction::VolumeUp => self.session.volume_up(),
            PlayerAction::VolumeDown => self.session.volume_down(),
            PlayerAction::ToggleMute => self.session.toggle_mute(),
            PlayerAction::ToggleFullscreen => self.session.toggle_fullscreen(),
            PlayerAction::ExitFullscreen => {
                if self.session.is_fullscreen() {
                    self.session.toggle_fullscreen();
                }
            }
            PlayerAction::TogglePictureInPicture => self.session.toggle_picture_in_picture(),
        }
    }

    /// One cadence step: poll the session, resolve scrub commits, refresh
    /// the progress readout, advance auto-hide, and run the throttled
    /// resume save.
    fn tick(&mut self, now: Instant) -> Effect {
        self.session.poll(now);

        self.scrub.tick(now, self.session.position_secs());

        // The preview owns the bar while a drag is active.
        if !self.scrub.is_dragging() {
            self.readout.refresh(
                now,
                self.session.position_secs(),
                self.session.buffered_end_secs(),
                self.session.duration_secs(),
            );
        }

        let pinned = !self.session.is_playing_or_will_resume()
            || self.session.quality_menu_open()
            || self.session.subtitle_menu_open();
        self.visibility.tick(now, pinned);

        self.maybe_save_resume(now);

        self.drain_session_events()
    }

    /// Throttled resume write during playback. Failures are logged, not
    /// surfaced; the teardown write reports them instead.
    fn maybe_save_resume(&mut self, now: Instant) {
        if !self.session.element().has_metadata() || !self.save_throttle.try_save(now) {
            return;
        }
        if let Some(key) = self.write_resume_record() {
            eprintln!("[WARN] Periodic resume save failed: {key}");
        }
    }

    fn write_resume_record(&mut self) -> Option<String> {
        let record = PlaybackRecord {
            position_secs: self.session.position_secs(),
            volume: self.session.volume().value(),
        };
        self.resume
            .save_for(self.session.media_type(), self.session.content_id(), record);
        self.resume.save_to(self.data_dir.clone())
    }

    /// Maps drained session events to host effects. Later events supersede
    /// earlier ones within a single drain.
    fn drain_session_events(&mut self) -> Effect {
        let mut effect = Effect::None;
        for event in self.session.take_events() {
            match event {
                PlayerEvent::FullscreenToggled { fullscreen } => {
                    effect = Effect::SetFullscreen(fullscreen);
                }
                PlayerEvent::PictureInPictureToggled { active } => {
                    effect = Effect::SetPictureInPicture(active);
                }
                PlayerEvent::QualitySwitchFailed { recurring, .. } => {
                    let key = if recurring {
                        "player-error-quality-switch-recurring"
                    } else {
                        "player-error-quality-switch"
                    };
                    effect = Effect::Notify(key.to_owned());
                }
                PlayerEvent::StateChanged { state } if state.is_terminal() => {
                    effect = Effect::Notify("player-error-source-unavailable".to_owned());
                }
                _ => {}
            }
        }
        effect
    }

    /// Tears the player down: writes the final resume record
    /// unconditionally, then pauses and silences the session.
    ///
    /// Returns a notification key when the final write fails.
    pub fn tear_down(&mut self) -> Option<String> {
        let warning = if self.session.element().has_metadata() {
            self.write_resume_record()
        } else {
            None
        };
        self.session.tear_down();
        warning
    }

    /// Renders the control bar, or nothing while the overlay is hidden.
    pub fn view<'a>(&self, i18n: &'a I18n) -> Element<'a, Message> {
        if !self.visibility.is_visible() {
            return Space::new().width(Length::Fill).into();
        }
        let state = self.control_bar_state();
        controls::view(controls::ViewContext { i18n }, &state).map(Message::Controls)
    }

    fn control_bar_state(&self) -> controls::ControlBarState {
        let snapshot = self.readout.snapshot();
        let state = self.session.state();
        controls::ControlBarState {
            is_playing: self.session.is_playing_or_will_resume(),
            is_stalled: state.is_stalled(),
            is_unplayable: state.is_terminal(),
            position_secs: snapshot.position_secs,
            duration_secs: self.session.duration_secs().unwrap_or(0.0),
            buffered_fraction: snapshot.buffered_fraction(),
            seek_preview_position: self.scrub.preview_secs(),
            volume: self.session.volume().value(),
            muted: self.session.is_muted(),
            quality_labels: self
                .session
                .sources()
                .qualities()
                .iter()
                .map(|variant| variant.label.clone())
                .collect(),
            active_quality: self.session.active_quality(),
            quality_menu_open: self.session.quality_menu_open(),
            switching: self.session.is_switching(),
            subtitle_languages: self
                .session
                .sources()
                .subtitle_tracks()
                .iter()
                .map(|track| track.language.clone())
                .collect(),
            active_subtitle: self.session.active_subtitle(),
            subtitle_menu_open: self.session.subtitle_menu_open(),
            fullscreen: self.session.is_fullscreen(),
            picture_in_picture: self.session.is_picture_in_picture(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    /// The playback session.
    #[must_use]
    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    /// Mutable session access; the host's surface for element reports.
    pub fn session_mut(&mut self) -> &mut PlayerSession {
        &mut self.session
    }

    /// Whether the control overlay is currently shown.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// The progress data the bar currently renders.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.readout.snapshot()
    }

    /// The resume store as last loaded or written.
    #[must_use]
    pub fn resume_store(&self) -> &ResumeStore {
        &self.resume
    }
}
