//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::StatusReport;

/// Body of POST /courts/:court/start
#[derive(Debug, Clone, Deserialize)]
pub struct StartBody {
    pub duration_minutes: u32,
    /// At most `MAX_PLAYER_NAME_CHARS` characters
    #[serde(default)]
    pub player_name: String,
}

/// Body of POST /courts/:court/settings
#[derive(Debug, Clone, Deserialize)]
pub struct CourtSettingsBody {
    pub volume: u8,
    pub warning_lead_minutes: u32,
    pub loop_alarm: bool,
}

/// Body of POST /settings/volume
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeBody {
    pub volume: u8,
}

/// Body of POST /settings/durations
#[derive(Debug, Clone, Deserialize)]
pub struct DurationsBody {
    pub alarm_seconds: u32,
    pub warning_seconds: u32,
}

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new("ok", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }
}

/// Status response with every court and the uptime
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub report: StatusReport,
    pub uptime: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
