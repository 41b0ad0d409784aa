// SPDX-License-Identifier: MPL-2.0
//! State-changed notification queue for the playback session.
//!
//! Controllers never call back into rendering code. Every observable
//! mutation pushes a [`PlayerEvent`] onto the session's queue and the
//! embedding component drains it with `take_events()`, in mutation order.

use super::state::PlaybackState;

/// A notification emitted by the playback session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The playback state transitioned. Carries the new state so observers
    /// can re-render without querying the session again.
    StateChanged { state: PlaybackState },

    /// Duration became known for the active source.
    MetadataLoaded { duration_secs: f64 },

    /// A committed seek was acknowledged by the element.
    SeekCompleted { position_secs: f64 },

    /// Volume or mute changed.
    VolumeChanged { volume: f32, muted: bool },

    /// A quality switch finished and playback was restored.
    QualityChanged { index: usize },

    /// A quality switch failed and the session reverted to the prior
    /// quality. `recurring` is set once this has happened more than once
    /// in the session, which is when the failure becomes user-visible.
    QualitySwitchFailed { attempted_index: usize, recurring: bool },

    /// The active subtitle track changed. `None` means subtitles are off.
    SubtitleChanged { index: Option<usize> },

    /// The session asks the host to enter or leave fullscreen.
    FullscreenToggled { fullscreen: bool },

    /// The session asks the host to enter or leave picture-in-picture.
    PictureInPictureToggled { active: bool },
}
