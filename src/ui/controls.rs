// SPDX-License-Identifier: MPL-2.0
//! Playback control bar UI.
//!
//! Provides a toolbar with play/pause, skip buttons, timeline scrubber with
//! a buffered-range indicator, time display, volume controls, and menus for
//! quality and subtitle selection.

use crate::i18n::fluent::I18n;
use iced::widget::{
    button, column, container, progress_bar, row, slider, text, tooltip, Column, Row, Text,
};
use iced::{Element, Length};

/// Slider step in seconds (1ms precision).
const SLIDER_STEP_SECS: f64 = 0.001;

/// Glyph size for control buttons.
const GLYPH_SIZE: f32 = 16.0;

/// Text size for the time display and menu entries.
const LABEL_SIZE: f32 = 14.0;

/// Uniform control button height.
const BUTTON_HEIGHT: f32 = 32.0;

/// Padding inside control buttons.
const BUTTON_PADDING: f32 = 6.0;

/// Gap between controls in the bar.
const BAR_SPACING: f32 = 6.0;

/// Fixed width of the volume slider.
const VOLUME_SLIDER_WIDTH: f32 = 80.0;

/// Height of the thin buffered-range bar under the timeline.
const BUFFER_BAR_HEIGHT: f32 = 4.0;

/// Width of quality and subtitle menu entries.
const MENU_ENTRY_WIDTH: f32 = 160.0;

/// Messages emitted by the control bar widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Toggle play/pause state.
    TogglePlayback,

    /// Seek preview - slider is being dragged (visual feedback only, no
    /// actual seek). Position in seconds.
    SeekPreview(f64),

    /// Commit seek - slider released, perform actual seek to preview position.
    SeekCommit,

    /// Skip backward by the configured keyboard step.
    SkipBackward,

    /// Skip forward by the configured keyboard step.
    SkipForward,

    /// Adjust volume (0.0 to 1.0).
    SetVolume(f32),

    /// Toggle mute state.
    ToggleMute,

    /// Toggle the quality selection menu.
    ToggleQualityMenu,

    /// Toggle the subtitle selection menu.
    ToggleSubtitleMenu,

    /// Switch to the quality variant at this index.
    SelectQuality(usize),

    /// Switch subtitles to the track at this index, or off.
    SelectSubtitle(Option<usize>),

    /// Toggle fullscreen.
    ToggleFullscreen,

    /// Toggle picture-in-picture.
    TogglePictureInPicture,
}

/// View context for rendering the control bar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// Render state for the control bar, assembled by the embedding component.
#[derive(Debug, Clone)]
pub struct ControlBarState {
    /// Is playback currently running (or about to resume)?
    pub is_playing: bool,

    /// Is playback stalled waiting for data?
    pub is_stalled: bool,

    /// Has playback failed terminally?
    pub is_unplayable: bool,

    /// Current playback position in seconds.
    pub position_secs: f64,

    /// Total duration in seconds, 0 until metadata arrives.
    pub duration_secs: f64,

    /// Buffered fraction of the timeline (0.0 to 1.0).
    pub buffered_fraction: f32,

    /// Preview position during seek drag in seconds, if any.
    /// When Some, the timeline and time display show this position instead
    /// of the actual playback position.
    pub seek_preview_position: Option<f64>,

    /// Current volume (0.0 to 1.0).
    pub volume: f32,

    /// Is audio muted?
    pub muted: bool,

    /// Labels of the available quality variants, in manifest order.
    pub quality_labels: Vec<String>,

    /// Index of the active quality variant.
    pub active_quality: usize,

    /// Is the quality menu open?
    pub quality_menu_open: bool,

    /// Is a quality switch in flight? Menu entries are inert while true.
    pub switching: bool,

    /// Languages of the available subtitle tracks.
    pub subtitle_languages: Vec<String>,

    /// Index of the active subtitle track, None when subtitles are off.
    pub active_subtitle: Option<usize>,

    /// Is the subtitle menu open?
    pub subtitle_menu_open: bool,

    /// Is the player fullscreen?
    pub fullscreen: bool,

    /// Is the player in picture-in-picture?
    pub picture_in_picture: bool,
}

impl Default for ControlBarState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_stalled: false,
            is_unplayable: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            buffered_fraction: 0.0,
            seek_preview_position: None,
            volume: crate::config::DEFAULT_VOLUME,
            muted: false,
            quality_labels: Vec::new(),
            active_quality: 0,
            quality_menu_open: false,
            switching: false,
            subtitle_languages: Vec::new(),
            active_subtitle: None,
            subtitle_menu_open: false,
            fullscreen: false,
            picture_in_picture: false,
        }
    }
}

/// Renders the playback control bar.
///
/// Returns a Row with:
/// - Skip backward / play-pause / skip forward buttons
/// - Timeline slider with buffered-range indicator
/// - Time display (current/total)
/// - Volume button and slider
/// - Subtitle and quality menu toggles (when the source offers a choice)
/// - Picture-in-picture and fullscreen buttons
pub fn view<'a>(ctx: ViewContext<'a>, state: &ControlBarState) -> Element<'a, Message> {
    let skip_back_button = glyph_button(
        "\u{23EA}",
        ctx.i18n.tr("video-skip-back-tooltip"),
        (!state.is_unplayable).then_some(Message::SkipBackward),
    );

    let (play_glyph, play_tooltip) = if state.is_playing {
        ("\u{23F8}", ctx.i18n.tr("video-pause-tooltip"))
    } else {
        ("\u{25B6}", ctx.i18n.tr("video-play-tooltip"))
    };
    let play_pause_button = glyph_button(
        play_glyph,
        play_tooltip,
        (!state.is_unplayable).then_some(Message::TogglePlayback),
    );

    let skip_forward_button = glyph_button(
        "\u{23E9}",
        ctx.i18n.tr("video-skip-forward-tooltip"),
        (!state.is_unplayable).then_some(Message::SkipForward),
    );

    // Use the preview position during a drag, otherwise the playback position.
    let timeline_position = state.seek_preview_position.unwrap_or(state.position_secs);

    // on_change gives the visual preview, on_release performs the one seek.
    let timeline = slider(
        0.0..=state.duration_secs,
        timeline_position,
        Message::SeekPreview,
    )
    .on_release(Message::SeekCommit)
    .width(Length::Fill)
    .step(SLIDER_STEP_SECS);

    let buffered_bar = container(progress_bar(0.0..=1.0, state.buffered_fraction))
        .width(Length::Fill)
        .height(Length::Fixed(BUFFER_BAR_HEIGHT));

    let timeline_stack: Element<'a, Message> = column![timeline, buffered_bar]
        .spacing(2.0)
        .width(Length::FillPortion(1))
        .into();

    let time_display = text(format!(
        "{} / {}",
        format_time(timeline_position),
        format_time(state.duration_secs)
    ))
    .size(LABEL_SIZE);

    let volume_glyph = if state.muted || state.volume == 0.0 {
        "\u{1F507}"
    } else {
        "\u{1F50A}"
    };
    let volume_tooltip = if state.muted {
        ctx.i18n.tr("video-unmute-tooltip")
    } else {
        ctx.i18n.tr("video-mute-tooltip")
    };
    let volume_button = glyph_button(volume_glyph, volume_tooltip, Some(Message::ToggleMute));

    let volume_slider = slider(0.0..=1.0, state.volume, Message::SetVolume)
        .width(Length::Fixed(VOLUME_SLIDER_WIDTH))
        .step(0.01);

    let mut controls: Row<'a, Message> = row![
        skip_back_button,
        play_pause_button,
        skip_forward_button,
        timeline_stack,
        time_display,
    ];

    if state.is_unplayable {
        controls = controls.push(
            text(ctx.i18n.tr("player-error-source-unavailable")).size(LABEL_SIZE),
        );
    } else if state.is_stalled {
        controls = controls.push(text(ctx.i18n.tr("player-stall-indicator")).size(LABEL_SIZE));
    }

    controls = controls.push(volume_button).push(volume_slider);

    if !state.subtitle_languages.is_empty() {
        controls = controls.push(glyph_button(
            "CC",
            ctx.i18n.tr("video-subtitles-tooltip"),
            Some(Message::ToggleSubtitleMenu),
        ));
    }

    if state.quality_labels.len() > 1 {
        controls = controls.push(glyph_button(
            "HD",
            ctx.i18n.tr("video-quality-tooltip"),
            Some(Message::ToggleQualityMenu),
        ));
    }

    let pip_button = glyph_button(
        "\u{29C9}",
        ctx.i18n.tr("video-pip-tooltip"),
        Some(Message::TogglePictureInPicture),
    );
    let fullscreen_tooltip = if state.fullscreen {
        ctx.i18n.tr("video-exit-fullscreen-tooltip")
    } else {
        ctx.i18n.tr("video-fullscreen-tooltip")
    };
    let fullscreen_button = glyph_button(
        "\u{26F6}",
        fullscreen_tooltip,
        Some(Message::ToggleFullscreen),
    );
    controls = controls.push(pip_button).push(fullscreen_button);

    let controls = controls
        .spacing(BAR_SPACING)
        .padding(BUTTON_PADDING)
        .align_y(iced::Alignment::Center);

    // Stack an open menu above the main bar.
    if state.quality_menu_open {
        let menu = build_quality_menu(state);
        let stacked: Column<'a, Message> = column![menu, controls].spacing(2.0).width(Length::Fill);
        container(stacked).width(Length::Fill).into()
    } else if state.subtitle_menu_open {
        let menu = build_subtitle_menu(ctx, state);
        let stacked: Column<'a, Message> = column![menu, controls].spacing(2.0).width(Length::Fill);
        container(stacked).width(Length::Fill).into()
    } else {
        container(controls).width(Length::Fill).into()
    }
}

/// Builds a glyph button wrapped in a tooltip. A button without a message
/// renders inert.
fn glyph_button<'a>(
    glyph: &'a str,
    tip: String,
    on_press: Option<Message>,
) -> Element<'a, Message> {
    let mut base = button(text(glyph).size(GLYPH_SIZE))
        .padding(BUTTON_PADDING)
        .width(Length::Shrink)
        .height(Length::Fixed(BUTTON_HEIGHT));
    if let Some(message) = on_press {
        base = base.on_press(message);
    }
    tooltip(base, Text::new(tip), tooltip::Position::Top)
        .gap(4)
        .into()
}

/// Builds the quality selection menu: one entry per variant, the active one
/// marked. Entries are inert while a switch is in flight.
fn build_quality_menu<'a>(state: &ControlBarState) -> Element<'a, Message> {
    let mut entries: Column<'a, Message> = Column::new().spacing(2.0);
    for (index, label) in state.quality_labels.iter().enumerate() {
        let title = if index == state.active_quality {
            format!("\u{2713} {label}")
        } else {
            label.clone()
        };
        let mut entry = button(text(title).size(LABEL_SIZE))
            .padding(BUTTON_PADDING)
            .width(Length::Fixed(MENU_ENTRY_WIDTH));
        if !state.switching {
            entry = entry.on_press(Message::SelectQuality(index));
        }
        entries = entries.push(entry);
    }
    container(entries).width(Length::Fill).into()
}

/// Builds the subtitle selection menu: an off entry followed by one entry
/// per track, the active one marked.
fn build_subtitle_menu<'a>(ctx: ViewContext<'a>, state: &ControlBarState) -> Element<'a, Message> {
    let off_label = ctx.i18n.tr("subtitles-off");
    let off_title = if state.active_subtitle.is_none() {
        format!("\u{2713} {off_label}")
    } else {
        off_label
    };
    let mut entries: Column<'a, Message> = Column::new().spacing(2.0).push(
        button(text(off_title).size(LABEL_SIZE))
            .on_press(Message::SelectSubtitle(None))
            .padding(BUTTON_PADDING)
            .width(Length::Fixed(MENU_ENTRY_WIDTH)),
    );
    for (index, language) in state.subtitle_languages.iter().enumerate() {
        let title = if state.active_subtitle == Some(index) {
            format!("\u{2713} {language}")
        } else {
            language.clone()
        };
        entries = entries.push(
            button(text(title).size(LABEL_SIZE))
                .on_press(Message::SelectSubtitle(Some(index)))
                .padding(BUTTON_PADDING)
                .width(Length::Fixed(MENU_ENTRY_WIDTH)),
        );
    }
    container(entries).width(Length::Fill).into()
}

/// Formats duration in MM:SS or HH:MM:SS format.
fn format_time(seconds: f64) -> String {
    let total_secs = seconds.max(0.0) as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_handles_zero() {
        assert_eq!(format_time(0.0), "00:00");
    }

    #[test]
    fn format_time_handles_seconds() {
        assert_eq!(format_time(45.0), "00:45");
    }

    #[test]
    fn format_time_handles_minutes() {
        assert_eq!(format_time(125.0), "02:05");
    }

    #[test]
    fn format_time_handles_hours() {
        assert_eq!(format_time(3665.0), "01:01:05");
    }

    #[test]
    fn format_time_handles_negative() {
        // Negative time should be clamped to 0
        assert_eq!(format_time(-10.0), "00:00");
    }

    #[test]
    fn control_bar_state_defaults() {
        let state = ControlBarState::default();
        assert!(!state.is_playing);
        assert!(!state.is_stalled);
        assert!(!state.is_unplayable);
        assert_eq!(state.position_secs, 0.0);
        assert_eq!(state.duration_secs, 0.0);
        assert_eq!(state.volume, crate::config::DEFAULT_VOLUME);
        assert!(!state.muted);
        assert!(state.seek_preview_position.is_none());
        assert!(state.quality_labels.is_empty());
        assert!(state.subtitle_languages.is_empty());
    }

    #[test]
    fn message_clone_works() {
        let msg = Message::TogglePlayback;
        let cloned = msg.clone();
        assert_eq!(msg, cloned);
    }

    #[test]
    fn message_debug_works() {
        let msg = Message::SeekPreview(30.5);
        let debug_str = format!("{msg:?}");
        assert!(debug_str.contains("SeekPreview"));
        assert!(debug_str.contains("30.5"));
    }

    #[test]
    fn view_renders() {
        let i18n = I18n::default();
        let ctx = ViewContext { i18n: &i18n };
        let state = ControlBarState::default();
        let _element = view(ctx, &state);
    }

    #[test]
    fn view_renders_with_quality_menu_open() {
        let i18n = I18n::default();
        let ctx = ViewContext { i18n: &i18n };
        let state = ControlBarState {
            duration_secs: 600.0,
            quality_labels: vec!["480p".to_owned(), "720p".to_owned(), "1080p".to_owned()],
            active_quality: 1,
            quality_menu_open: true,
            ..ControlBarState::default()
        };
        let _element = view(ctx, &state);
    }

    #[test]
    fn view_renders_with_subtitle_menu_open() {
        let i18n = I18n::default();
        let ctx = ViewContext { i18n: &i18n };
        let state = ControlBarState {
            duration_secs: 600.0,
            subtitle_languages: vec!["English".to_owned(), "French".to_owned()],
            active_subtitle: Some(0),
            subtitle_menu_open: true,
            ..ControlBarState::default()
        };
        let _element = view(ctx, &state);
    }

    #[test]
    fn timeline_uses_preview_position_when_set() {
        let state = ControlBarState {
            is_playing: true,
            position_secs: 30.0,
            duration_secs: 120.0,
            seek_preview_position: Some(90.0),
            ..ControlBarState::default()
        };

        // The preview owns the timeline and the time display during a drag.
        let position = state.seek_preview_position.unwrap_or(state.position_secs);
        assert_eq!(position, 90.0);
    }

    #[test]
    fn timeline_falls_back_to_playback_position() {
        let state = ControlBarState {
            position_secs: 30.0,
            duration_secs: 120.0,
            ..ControlBarState::default()
        };

        let position = state.seek_preview_position.unwrap_or(state.position_secs);
        assert_eq!(position, 30.0);
    }
}
