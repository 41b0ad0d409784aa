// SPDX-License-Identifier: MPL-2.0
//! Playback control surface.
//!
//! Everything here is headless: the session, the scrub gesture, the
//! visibility timer and the keybind map are plain state machines driven by
//! commands, host reports and explicit ticks, so every behavior is
//! testable without a window or a real decoder.

mod element;
mod events;
pub mod keybinds;
mod scrub;
mod state;
mod visibility;
mod volume;

pub use element::{ElementError, ElementEvent, MediaElement};
pub use events::PlayerEvent;
pub use keybinds::PlayerAction;
pub use scrub::{
    pointer_to_secs, ProgressReadout, ProgressSnapshot, ScrubController, ScrubPhase, TrackBounds,
};
pub use state::{PlaybackState, PlayerSession};
pub use visibility::{ControlsVisibility, VisibilityController};
pub use volume::Volume;

use crate::source::{ContentId, MediaType, SourceSet};

/// Creates a playback session for the given content and resolved sources.
pub fn create_session(
    content_id: ContentId,
    media_type: MediaType,
    sources: SourceSet,
) -> PlayerSession {
    PlayerSession::new(content_id, media_type, sources)
}
