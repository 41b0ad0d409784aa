// SPDX-License-Identifier: MPL-2.0
//! Durable client-side state.
//!
//! Two CBOR stores live in the app data directory: `resume.cbor` with a
//! playback record per content item, and `watchlist.cbor` with the saved
//! titles. Both are best-effort; a failure to read or write degrades to a
//! non-persistent session and never interrupts playback.
//!
//! The file location honors the standard resolution order (explicit
//! override, then `PLAYDECK_DATA_DIR`, then the platform data directory),
//! which is how tests keep their state isolated.

mod resume;
mod watchlist;

pub use resume::{storage_key, PlaybackRecord, ResumeStore, SaveThrottle, STORAGE_NAMESPACE};
pub use watchlist::{WatchlistEntry, WatchlistStore};
