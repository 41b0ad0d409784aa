// SPDX-License-Identifier: MPL-2.0
//! Resume-position and volume persistence.
//!
//! One CBOR file holds a record per content item, keyed by
//! `"<namespace>:<mediaType>:<contentId>"`. Reads are best-effort: a
//! missing or unreadable store comes back empty and every lookup in it is
//! absent, so a broken disk can never block playback. During playback,
//! writes go through [`SaveThrottle`]; teardown writes unconditionally.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::paths;
use crate::source::{ContentId, MediaType};

/// Store file name within the app data directory.
const RESUME_FILE: &str = "resume.cbor";

/// Prefix of every storage key.
pub const STORAGE_NAMESPACE: &str = "playdeck";

/// Builds the storage key for one content item.
pub fn storage_key(media_type: MediaType, content_id: &ContentId) -> String {
    format!(
        "{}:{}:{}",
        STORAGE_NAMESPACE,
        media_type.as_str(),
        content_id.as_str()
    )
}

/// What playback remembers about one content item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    /// Last known playhead position.
    pub position_secs: f64,
    /// Volume when the session ended, `0.0..=1.0`.
    pub volume: f32,
}

/// Playback records for all content, persisted as one CBOR file.
///
/// The store itself is cheap to keep in memory; sessions read their record
/// once at creation and write back through the bridge on a throttle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeStore {
    #[serde(default)]
    records: BTreeMap<String, PlaybackRecord>,
}

impl ResumeStore {
    /// Loads the store from the default location.
    ///
    /// Returns `(store, optional_warning)`. Failures degrade to an empty
    /// store; the warning is an i18n key the host may surface.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads the store from a custom base directory.
    ///
    /// # Path Resolution
    ///
    /// 1. `base_dir` parameter (if `Some`)
    /// 2. `PLAYDECK_DATA_DIR` environment variable (if set)
    /// 3. Platform-specific data directory
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
                        Some("notification-resume-parse-error".to_string()),
                    ),
                }
            }
            Err(_) => (
                Self::default(),
                Some("notification-storage-unavailable".to_string()),
            ),
        }
    }

    /// Saves the store to the default location.
    ///
    /// Creates the parent directory if needed. Returns an optional warning
    /// key on failure; playback carries on without persistence either way.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves the store to a custom base directory.
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
            path.push(RESUME_FILE);
            path
        })
    }

    /// Looks up the record for one content item; absent when never saved.
    pub fn load_for(&self, media_type: MediaType, content_id: &ContentId) -> Option<PlaybackRecord> {
        self.records
            .get(&storage_key(media_type, content_id))
            .copied()
    }

    /// Inserts or replaces the record for one content item.
    pub fn save_for(
        &mut self,
        media_type: MediaType,
        content_id: &ContentId,
        record: PlaybackRecord,
    ) {
        self.records
            .insert(storage_key(media_type, content_id), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Limits periodic resume writes during playback.
///
/// At most one write per interval; teardown bypasses the throttle with an
/// unconditional final write.
#[derive(Debug)]
pub struct SaveThrottle {
    interval: Duration,
    last_save: Option<Instant>,
}

impl SaveThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: None,
        }
    }

    /// Whether a periodic write is due now. Records the write when it is.
    pub fn try_save(&mut self, now: Instant) -> bool {
        match self.last_save {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_save = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn record(position_secs: f64, volume: f32) -> PlaybackRecord {
        PlaybackRecord {
            position_secs,
            volume,
        }
    }

    #[test]
    fn storage_keys_follow_the_namespaced_format() {
        assert_eq!(
            storage_key(MediaType::Tv, &ContentId::new("101")),
            "playdeck:tv:101"
        );
        assert_eq!(
            storage_key(MediaType::Movie, &ContentId::new("550")),
            "playdeck:movie:550"
        );
    }

    #[test]
    fn save_for_then_load_for_round_trips() {
        let mut store = ResumeStore::default();
        let id = ContentId::new("101");

        store.save_for(MediaType::Tv, &id, record(42.0, 0.7));

        assert_eq!(
            store.load_for(MediaType::Tv, &id),
            Some(record(42.0, 0.7))
        );
    }

    #[test]
    fn unknown_content_reads_as_absent() {
        let store = ResumeStore::default();
        assert_eq!(
            store.load_for(MediaType::Movie, &ContentId::new("999")),
            None
        );
    }

    #[test]
    fn records_are_isolated_by_media_type() {
        let mut store = ResumeStore::default();
        let id = ContentId::new("101");

        store.save_for(MediaType::Tv, &id, record(42.0, 0.7));
        store.save_for(MediaType::Movie, &id, record(90.0, 0.3));

        assert_eq!(store.load_for(MediaType::Tv, &id), Some(record(42.0, 0.7)));
        assert_eq!(
            store.load_for(MediaType::Movie, &id),
            Some(record(90.0, 0.3))
        );
    }

    #[test]
    fn save_for_replaces_the_previous_record() {
        let mut store = ResumeStore::default();
        let id = ContentId::new("101");

        store.save_for(MediaType::Tv, &id, record(42.0, 0.7));
        store.save_for(MediaType::Tv, &id, record(120.0, 0.7));

        assert_eq!(store.load_for(MediaType::Tv, &id), Some(record(120.0, 0.7)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_round_trips_through_disk() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base = Some(temp_dir.path().to_path_buf());

        let mut store = ResumeStore::default();
        store.save_for(MediaType::Tv, &ContentId::new("101"), record(42.0, 0.7));
        assert_eq!(store.save_to(base.clone()), None);

        let (loaded, warning) = ResumeStore::load_from(base);
        assert_eq!(warning, None);
        assert_eq!(loaded, store);
    }

    #[test]
    fn missing_store_loads_empty_without_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (store, warning) = ResumeStore::load_from(Some(temp_dir.path().to_path_buf()));

        assert!(store.is_empty());
        assert_eq!(warning, None);
    }

    #[test]
    fn corrupted_store_loads_empty_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(RESUME_FILE);
        fs::File::create(&path)
            .expect("failed to create store file")
            .write_all(b"not valid cbor data")
            .expect("failed to write garbage");

        let (store, warning) = ResumeStore::load_from(Some(temp_dir.path().to_path_buf()));

        assert!(store.is_empty());
        assert_eq!(
            warning,
            Some("notification-resume-parse-error".to_string())
        );
        assert_eq!(store.load_for(MediaType::Tv, &ContentId::new("101")), None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested = temp_dir.path().join("deeply").join("nested");

        let store = ResumeStore::default();
        assert_eq!(store.save_to(Some(nested.clone())), None);
        assert!(nested.join(RESUME_FILE).exists());
    }

    #[test]
    fn throttle_spaces_out_periodic_saves() {
        let mut throttle = SaveThrottle::new(Duration::from_secs(5));
        let t0 = Instant::now();

        assert!(throttle.try_save(t0));
        assert!(!throttle.try_save(t0 + Duration::from_secs(2)));
        assert!(!throttle.try_save(t0 + Duration::from_millis(4900)));
        assert!(throttle.try_save(t0 + Duration::from_secs(5)));
        assert!(!throttle.try_save(t0 + Duration::from_secs(6)));
    }
}
