// SPDX-License-Identifier: MPL-2.0
//! `playdeck` is an embeddable playback control surface for streaming
//! clients, built with the Iced GUI framework.
//!
//! It models a streaming player's control plane - play/pause, scrubbing
//! with preview, quality and subtitle switching, resume persistence -
//! behind a deterministic media element facade, and demonstrates
//! internationalization with Fluent and modular UI design.

#![doc(html_root_url = "https://docs.rs/playdeck/0.2.0")]

pub mod config;
pub mod error;
pub mod i18n;
pub mod paths;
pub mod persist;
pub mod player;
pub mod source;
pub mod ui;

#[cfg(test)]
mod test_utils;
