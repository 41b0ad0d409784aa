// SPDX-License-Identifier: MPL-2.0
//! Keyboard dispatch for the player.
//!
//! A stateless map from raw key presses to player actions. Dispatch
//! respects widget capture: a press consumed by a text input (a search
//! field, a rename box) never reaches the player, so typing cannot start
//! seeking or flip the mute state.

use iced::event;
use iced::keyboard;

/// Player commands reachable from the keyboard.
///
/// Seek and volume actions carry no amount; the embedding component applies
/// the configured step when it handles the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    TogglePlay,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleFullscreen,
    ExitFullscreen,
    TogglePictureInPicture,
}

/// Maps a raw runtime event to a player action.
///
/// Returns `None` when a widget already captured the event and for
/// anything that is not a plain key press.
pub fn dispatch(event: &iced::Event, status: event::Status) -> Option<PlayerAction> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        iced::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            action_for(key, *modifiers)
        }
        _ => None,
    }
}

/// The fixed key map: space, arrows, m, f, p, Escape.
///
/// Chords are left alone so application-level shortcuts keep working.
pub fn action_for(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> Option<PlayerAction> {
    if modifiers.command() || modifiers.alt() {
        return None;
    }
    match key {
        keyboard::Key::Named(named) => match named {
            keyboard::key::Named::Space => Some(PlayerAction::TogglePlay),
            keyboard::key::Named::ArrowLeft => Some(PlayerAction::SeekBackward),
            keyboard::key::Named::ArrowRight => Some(PlayerAction::SeekForward),
            keyboard::key::Named::ArrowUp => Some(PlayerAction::VolumeUp),
            keyboard::key::Named::ArrowDown => Some(PlayerAction::VolumeDown),
            keyboard::key::Named::Escape => Some(PlayerAction::ExitFullscreen),
            _ => None,
        },
        keyboard::Key::Character(c) => {
            let c = c.as_str();
            if c.eq_ignore_ascii_case("m") {
                Some(PlayerAction::ToggleMute)
            } else if c.eq_ignore_ascii_case("f") {
                Some(PlayerAction::ToggleFullscreen)
            } else if c.eq_ignore_ascii_case("p") {
                Some(PlayerAction::TogglePictureInPicture)
            } else {
                None
            }
        }
        _ => None,
    }
}
