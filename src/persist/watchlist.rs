// SPDX-License-Identifier: MPL-2.0
//! Watchlist persistence.
//!
//! The watchlist lives outside any playback session: catalog pages toggle
//! titles in and out of it. Entries are unique per `(media_type, content_id)`
//! and carry the timestamp they were added, so listings can show the newest
//! saves first. Storage follows the same CBOR pattern as the resume store.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paths;
use crate::source::{ContentId, MediaType};

/// Store file name within the app data directory.
const WATCHLIST_FILE: &str = "watchlist.cbor";

/// One saved title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub content_id: ContentId,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    /// Builds an entry stamped with the current time.
    pub fn new(
        content_id: ContentId,
        media_type: MediaType,
        title: impl Into<String>,
        poster_path: Option<String>,
    ) -> Self {
        Self {
            content_id,
            media_type,
            title: title.into(),
            poster_path,
            added_at: Utc::now(),
        }
    }
}

/// Saved titles, persisted as one CBOR file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistStore {
    #[serde(default)]
    entries: Vec<WatchlistEntry>,
}

impl WatchlistStore {
    /// Loads the watchlist from the default location.
    ///
    /// Returns `(store, optional_warning)`; failures degrade to an empty
    /// list with an i18n warning key.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads the watchlist from a custom base directory.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::store_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => {
                let reader = BufReader::new(file);
                match ciborium::from_reader(reader) {
                    Ok(store) => (store, None),
                    Err(_) => (
                        Self::default(),
                        Some("notification-watchlist-parse-error".to_string()),
                    ),
                }
            }
            Err(_) => (
                Self::default(),
                Some("notification-storage-unavailable".to_string()),
            ),
        }
    }

    /// Saves the watchlist to the default location.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves the watchlist to a custom base directory, creating parent
    /// directories as needed.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::store_file_path_with_override(base_dir) else {
            return Some("notification-storage-unavailable".to_string());
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-storage-unavailable".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                let writer = BufWriter::new(file);
                if ciborium::into_writer(self, writer).is_err() {
                    return Some("notification-storage-unavailable".to_string());
                }
                None
            }
            Err(_) => Some("notification-storage-unavailable".to_string()),
        }
    }

    fn store_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(WATCHLIST_FILE);
            path
        })
    }

    pub fn contains(&self, media_type: MediaType, content_id: &ContentId) -> bool {
        self.entries
            .iter()
            .any(|e| e.media_type == media_type && &e.content_id == content_id)
    }

    /// Adds an entry unless the title is already saved.
    ///
    /// Returns whether the entry was added.
    pub fn add(&mut self, entry: WatchlistEntry) -> bool {
        if self.contains(entry.media_type, &entry.content_id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Removes a saved title. Returns whether anything was removed.
    pub fn remove(&mut self, media_type: MediaType, content_id: &ContentId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.media_type == media_type && &e.content_id == content_id));
        self.entries.len() != before
    }

    /// Adds the title if absent, removes it if present.
    ///
    /// Returns whether the title is on the list afterwards.
    pub fn toggle(&mut self, entry: WatchlistEntry) -> bool {
        if self.remove(entry.media_type, &entry.content_id) {
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    /// Entries sorted newest save first.
    pub fn newest_first(&self) -> Vec<&WatchlistEntry> {
        let mut sorted: Vec<&WatchlistEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
