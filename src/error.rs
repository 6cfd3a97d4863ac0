//! Error types for the court timer core and its collaborators

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by control requests against the core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("court {0} is out of range (expected 0..{max})", max = crate::state::COURT_COUNT)]
    InvalidCourt(usize),

    #[error("duration of {0} minutes is out of range")]
    InvalidDuration(u32),

    #[error("volume {0} is out of range")]
    InvalidVolume(u8),

    #[error("warning lead of {0} minutes is out of range")]
    InvalidWarningLead(u32),

    #[error("player name of {0} characters is too long")]
    InvalidPlayerName(usize),

    #[error("alarm durations {alarm_seconds}s/{warning_seconds}s are out of range")]
    InvalidAlarmDurations { alarm_seconds: u32, warning_seconds: u32 },

    #[error("settings were applied but could not be persisted")]
    Persist(#[from] StoreError),
}

impl CoreError {
    /// Whether the request was rejected before touching any state
    pub fn is_validation(&self) -> bool {
        !matches!(self, CoreError::Persist(_))
    }
}

/// Errors from the persisted settings store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from clip storage and decoding
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("no clip storage backend is available")]
    NoStorage,

    #[error("clip {0} not found")]
    NotFound(String),

    #[error("failed to open clip {name}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode clip {name}")]
    Decode {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
