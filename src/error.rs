// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    /// A source manifest payload could not be interpreted.
    Manifest(String),
    Player(PlayerError),
}

/// Playback error taxonomy.
///
/// Each variant carries its handling policy: `is_fatal` decides whether the
/// session terminates, `i18n_key` names the user-facing message where one
/// exists at all. Variants without a visible surface (clamped seeks, silent
/// persistence degradation) still appear here so call sites classify failures
/// uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// No playable URL could be resolved, or the element reported a fatal
    /// media error. Terminal for the session; never retried automatically.
    SourceUnavailable,

    /// The element ran out of buffered data mid-playback. Transient and
    /// self-resolving; surfaced as a buffering indicator, not an error.
    PlaybackStalled,

    /// A requested seek target fell outside `[0, duration]`. The target is
    /// clamped and playback continues; nothing is shown to the user.
    SeekOutOfRange,

    /// A quality switch failed to load and the prior variant was restored.
    /// Carries the label of the variant that failed.
    QualitySwitchFailed(String),

    /// Durable storage rejected a read or write. The session continues
    /// without persistence.
    PersistenceUnavailable,
}

impl PlayerError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            PlayerError::SourceUnavailable => "player-error-source-unavailable",
            PlayerError::PlaybackStalled => "player-stall-indicator",
            PlayerError::SeekOutOfRange => "player-error-seek-out-of-range",
            PlayerError::QualitySwitchFailed(_) => "player-error-quality-switch",
            PlayerError::PersistenceUnavailable => "notification-storage-unavailable",
        }
    }

    /// Whether the failure ends the playback session.
    ///
    /// Only an unavailable source is terminal. Everything else either
    /// self-resolves (stalls), is corrected on the spot (clamped seeks,
    /// reverted switches) or degrades a side feature (persistence).
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlayerError::SourceUnavailable)
    }

    /// Whether the failure is expected to clear without intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlayerError::PlaybackStalled)
    }
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::SourceUnavailable => write!(f, "No playable source available"),
            PlayerError::PlaybackStalled => write!(f, "Playback stalled while buffering"),
            PlayerError::SeekOutOfRange => write!(f, "Seek target outside playable range"),
            PlayerError::QualitySwitchFailed(label) => {
                write!(f, "Switch to quality {} failed", label)
            }
            PlayerError::PersistenceUnavailable => write!(f, "Playback storage unavailable"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Manifest(e) => write!(f, "Manifest Error: {}", e),
            Error::Player(e) => write!(f, "Playback Error: {}", e),
        }
    }
}

impl From<PlayerError> for Error {
    fn from(err: PlayerError) -> Self {
        Error::Player(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Manifest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
