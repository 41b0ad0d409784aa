// SPDX-License-Identifier: MPL-2.0
//! User interface layer.
//!
//! Follows a component-based architecture with the Elm-style "state down,
//! messages up" pattern.
//!
//! - [`component`] - Embeddable player component wiring session, scrub,
//!   visibility, keybinds, and persistence into one update/view unit
//! - [`controls`] - The playback control bar view

pub mod component;
pub mod controls;

pub use component::{Effect, Message, PlayerComponent};
