// SPDX-License-Identifier: MPL-2.0
//! Integration tests for on-disk persistence
//!
//! These tests exercise the resume store, watchlist, and config files
//! through real temporary directories: round trips, malformed payload
//! recovery, and key formats.

use chrono::{TimeZone, Utc};
use playdeck::config::{self, Config};
use playdeck::persist::{storage_key, PlaybackRecord, ResumeStore, WatchlistEntry, WatchlistStore};
use playdeck::source::{ContentId, MediaType};
use tempfile::tempdir;

#[test]
fn test_resume_record_round_trip_through_disk() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let data_dir = Some(dir.path().to_path_buf());

    let mut store = ResumeStore::default();
    store.save_for(
        MediaType::Tv,
        &ContentId::new("101"),
        PlaybackRecord {
            position_secs: 42.0,
            volume: 0.7,
        },
    );
    assert!(store.save_to(data_dir.clone()).is_none());

    let (loaded, warning) = ResumeStore::load_from(data_dir);
    assert!(warning.is_none());
    let record = loaded
        .load_for(MediaType::Tv, &ContentId::new("101"))
        .expect("record survives the round trip");
    assert!((record.position_secs - 42.0).abs() < 1e-9);
    assert!((record.volume - 0.7).abs() < 1e-6);
}

#[test]
fn test_storage_keys_namespace_media_type_and_id() {
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
fn test_records_do_not_collide_across_media_types() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let data_dir = Some(dir.path().to_path_buf());

    let mut store = ResumeStore::default();
    store.save_for(
        MediaType::Tv,
        &ContentId::new("101"),
        PlaybackRecord {
            position_secs: 10.0,
            volume: 1.0,
        },
    );
    store.save_for(
        MediaType::Movie,
        &ContentId::new("101"),
        PlaybackRecord {
            position_secs: 99.0,
            volume: 0.5,
        },
    );
    assert!(store.save_to(data_dir.clone()).is_none());

    let (loaded, _) = ResumeStore::load_from(data_dir);
    let tv = loaded
        .load_for(MediaType::Tv, &ContentId::new("101"))
        .expect("tv record present");
    let movie = loaded
        .load_for(MediaType::Movie, &ContentId::new("101"))
        .expect("movie record present");
    assert!((tv.position_secs - 10.0).abs() < 1e-9);
    assert!((movie.position_secs - 99.0).abs() < 1e-9);
}

#[test]
fn test_malformed_resume_file_resets_to_absent_with_warning() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("resume.cbor"), b"not a cbor map at all")
        .expect("Failed to write garbage file");

    let (loaded, warning) = ResumeStore::load_from(Some(dir.path().to_path_buf()));

    assert!(loaded.is_empty());
    assert_eq!(warning.as_deref(), Some("notification-resume-parse-error"));
    assert!(loaded
        .load_for(MediaType::Tv, &ContentId::new("101"))
        .is_none());
}

#[test]
fn test_missing_resume_file_loads_quietly() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let (loaded, warning) = ResumeStore::load_from(Some(dir.path().to_path_buf()));

    assert!(loaded.is_empty());
    assert!(warning.is_none());
}

#[test]
fn test_watchlist_round_trip_and_ordering() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let data_dir = Some(dir.path().to_path_buf());

    let mut store = WatchlistStore::default();
    let mut older = WatchlistEntry::new(ContentId::new("550"), MediaType::Movie, "Fight Club", None);
    older.added_at = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut newer = WatchlistEntry::new(
        ContentId::new("101"),
        MediaType::Tv,
        "The Wire",
        Some("/posters/101.jpg".to_owned()),
    );
    newer.added_at = Utc
        .with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    assert!(store.add(older));
    assert!(store.add(newer));
    // Adding the same title twice is a no-op.
    assert!(!store.add(WatchlistEntry::new(
        ContentId::new("550"),
        MediaType::Movie,
        "Fight Club",
        None,
    )));
    assert!(store.save_to(data_dir.clone()).is_none());

    let (loaded, warning) = WatchlistStore::load_from(data_dir);
    assert!(warning.is_none());
    assert_eq!(loaded.len(), 2);
    assert!(loaded.contains(MediaType::Movie, &ContentId::new("550")));
    assert!(loaded.contains(MediaType::Tv, &ContentId::new("101")));

    let newest = loaded.newest_first();
    assert_eq!(newest[0].title, "The Wire");
}

#[test]
fn test_watchlist_toggle_flips_membership() {
    let mut store = WatchlistStore::default();
    let entry = WatchlistEntry::new(ContentId::new("603"), MediaType::Movie, "The Matrix", None);

    assert!(store.toggle(entry.clone()));
    assert!(store.contains(MediaType::Movie, &ContentId::new("603")));

    assert!(!store.toggle(entry));
    assert!(!store.contains(MediaType::Movie, &ContentId::new("603")));
}

#[test]
fn test_config_round_trip_preserves_playback_settings() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.general.language = Some("fr".to_owned());
    config.playback.volume = Some(0.35);
    config.playback.muted = Some(true);
    config.controls.hide_delay_secs = Some(5);

    config::save_to_path(&config, &path).expect("Failed to save config");
    let loaded = config::load_from_path(&path).expect("Failed to load config");

    assert_eq!(loaded, config);
    assert!((loaded.effective_volume() - 0.35).abs() < 1e-6);
    assert!(loaded.starts_muted());
    assert_eq!(loaded.hide_delay().as_secs(), 5);
}

#[test]
fn test_config_load_with_override_falls_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    assert_eq!(config, Config::default());
}
