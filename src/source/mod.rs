// SPDX-License-Identifier: MPL-2.0
//! Source manifests and playable variants.
//!
//! A streaming backend describes a title as a JSON payload of quality-labeled
//! URLs plus optional subtitle tracks. This module resolves that payload into
//! the [`SourceSet`] a playback session runs on. Resolution preserves the
//! backend's variant order, normalizes quality labels, and treats a payload
//! without any playable URL as a fatal [`PlayerError::SourceUnavailable`].

use crate::error::{Error, PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a title within the catalog.
///
/// Opaque to the player; it only flows into storage keys and watchlist
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of catalog entry a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Wire and storage-key spelling of the media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(Error::Manifest(format!("unknown media type: {}", other))),
        }
    }
}

/// One playable rendition of a title.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityVariant {
    /// Display label, e.g. "1080p" or "auto".
    pub label: String,
    pub url: String,
}

/// One selectable subtitle track.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    /// Display language, e.g. "English".
    pub language: String,
    pub url: String,
}

/// Resolved playable sources for one title.
///
/// Variant order is the backend's order; index 0 is the default quality.
/// A `fixed` set carries a single rendition and offers no quality menu.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSet {
    qualities: Vec<QualityVariant>,
    subtitle_tracks: Vec<SubtitleTrack>,
    fixed: bool,
}

impl SourceSet {
    /// Builds a set from explicit quality variants.
    ///
    /// Fails with [`PlayerError::SourceUnavailable`] when no variant is given;
    /// a session cannot start without a playable URL.
    pub fn new(qualities: Vec<QualityVariant>, subtitle_tracks: Vec<SubtitleTrack>) -> Result<Self> {
        if qualities.is_empty() {
            return Err(PlayerError::SourceUnavailable.into());
        }
        Ok(Self {
            qualities,
            subtitle_tracks,
            fixed: false,
        })
    }

    /// Builds a single fixed-source set with no quality menu.
    pub fn from_single_url(url: impl Into<String>, subtitle_tracks: Vec<SubtitleTrack>) -> Self {
        Self {
            qualities: vec![QualityVariant {
                label: "auto".to_string(),
                url: url.into(),
            }],
            subtitle_tracks,
            fixed: true,
        }
    }

    pub fn qualities(&self) -> &[QualityVariant] {
        &self.qualities
    }

    pub fn quality_count(&self) -> usize {
        self.qualities.len()
    }

    pub fn variant(&self, index: usize) -> Option<&QualityVariant> {
        self.qualities.get(index)
    }

    pub fn url_at(&self, index: usize) -> Option<&str> {
        self.qualities.get(index).map(|v| v.url.as_str())
    }

    /// Whether the UI should offer a quality selection menu.
    pub fn has_quality_menu(&self) -> bool {
        !self.fixed && !self.qualities.is_empty()
    }

    pub fn subtitle_tracks(&self) -> &[SubtitleTrack] {
        &self.subtitle_tracks
    }
}

// =============================================================================
// Manifest Resolution
// =============================================================================

#[derive(Debug, Deserialize)]
struct ManifestPayload {
    #[serde(default)]
    sources: Vec<ManifestSource>,
    #[serde(default)]
    subtitles: Vec<ManifestSubtitle>,
    /// Fallback single URL for backends without quality variants.
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManifestSource {
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ManifestSubtitle {
    #[serde(default)]
    lang: String,
    #[serde(default)]
    url: String,
}

/// Resolves a backend manifest payload into a [`SourceSet`].
///
/// Entries without a URL are dropped. A payload that yields no playable URL
/// at all resolves to [`PlayerError::SourceUnavailable`]; a syntactically
/// broken payload resolves to [`Error::Manifest`].
pub fn resolve_manifest(payload: &str) -> Result<SourceSet> {
    let manifest: ManifestPayload = serde_json::from_str(payload)?;

    let subtitle_tracks: Vec<SubtitleTrack> = manifest
        .subtitles
        .into_iter()
        .filter(|s| !s.lang.trim().is_empty() && !s.url.trim().is_empty())
        .map(|s| SubtitleTrack {
            language: s.lang.trim().to_string(),
            url: s.url,
        })
        .collect();

    let qualities: Vec<QualityVariant> = manifest
        .sources
        .into_iter()
        .filter(|s| !s.url.trim().is_empty())
        .map(|s| QualityVariant {
            label: normalize_label(s.quality.as_deref()),
            url: s.url,
        })
        .collect();

    if !qualities.is_empty() {
        return SourceSet::new(qualities, subtitle_tracks);
    }

    match manifest.url {
        Some(url) if !url.trim().is_empty() => Ok(SourceSet::from_single_url(url, subtitle_tracks)),
        _ => Err(PlayerError::SourceUnavailable.into()),
    }
}

/// Normalizes a backend quality label for display.
///
/// Bare resolution numbers ("1080") gain the conventional "p" suffix;
/// a missing label becomes "auto".
fn normalize_label(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return "auto".to_string();
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return format!("{}p", trimmed);
    }
    trimmed.to_string()
}
