//! HTTP endpoint handlers

use std::{error::Error as _, sync::Arc, time::Instant};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use tracing::{error, info};

use super::responses::{
    ApiResponse, CourtSettingsBody, DurationsBody, HealthResponse, StartBody, StatusResponse,
    VolumeBody,
};
use crate::{
    error::CoreError,
    state::{Reply, Request},
    tasks::{ControlHandle, LoopGone},
};

/// State shared by all handlers
#[derive(Debug)]
pub struct ApiState {
    pub control: ControlHandle,
    pub start_time: Instant,
}

impl ApiState {
    pub fn new(control: ControlHandle) -> Self {
        Self {
            control,
            start_time: Instant::now(),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    async fn submit(&self, request: Request) -> Result<Reply, ApiError> {
        Ok(self.control.call(request).await??)
    }
}

/// Failure of a control request, mapped onto an HTTP status
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Unavailable,
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Core(e)
    }
}

impl From<LoopGone> for ApiError {
    fn from(_: LoopGone) -> Self {
        ApiError::Unavailable
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Core(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Core(e) => {
                let message = match e.source() {
                    Some(source) => format!("{}: {}", e, source),
                    None => e.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Unavailable => {
                error!("Control loop is not accepting requests");
                (StatusCode::SERVICE_UNAVAILABLE, LoopGone.to_string())
            }
        };
        (status, Json(ApiResponse::error(message))).into_response()
    }
}

/// Handle POST /courts/:court/start - Start or restart a countdown
pub async fn start_handler(
    State(api): State<Arc<ApiState>>,
    Path(court): Path<usize>,
    Json(body): Json<StartBody>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::Start {
        court,
        duration_minutes: body.duration_minutes,
        player_name: body.player_name.clone(),
    })
    .await?;

    info!("Start endpoint called for court index {}", court);
    Ok(Json(ApiResponse::ok(format!(
        "Court {} started for {} minutes",
        court, body.duration_minutes
    ))))
}

/// Handle POST /courts/:court/pause - Toggle pause
pub async fn pause_handler(
    State(api): State<Arc<ApiState>>,
    Path(court): Path<usize>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::PauseOrResume { court }).await?;
    Ok(Json(ApiResponse::ok(format!("Court {} pause toggled", court))))
}

/// Handle POST /courts/:court/stop - Stop the countdown and its alarm
pub async fn stop_handler(
    State(api): State<Arc<ApiState>>,
    Path(court): Path<usize>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::Stop { court }).await?;
    Ok(Json(ApiResponse::ok(format!("Court {} stopped", court))))
}

/// Handle POST /courts/:court/settings - Update per-court settings
pub async fn court_settings_handler(
    State(api): State<Arc<ApiState>>,
    Path(court): Path<usize>,
    Json(body): Json<CourtSettingsBody>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::UpdateSettings {
        court,
        volume: body.volume,
        warning_lead_minutes: body.warning_lead_minutes,
        loop_alarm: body.loop_alarm,
    })
    .await?;
    Ok(Json(ApiResponse::ok(format!("Court {} settings saved", court))))
}

/// Handle POST /settings/volume - Update the global volume
pub async fn volume_handler(
    State(api): State<Arc<ApiState>>,
    Json(body): Json<VolumeBody>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::UpdateGlobalVolume { volume: body.volume }).await?;
    Ok(Json(ApiResponse::ok(format!("Global volume set to {}", body.volume))))
}

/// Handle POST /settings/durations - Update alarm window lengths
pub async fn durations_handler(
    State(api): State<Arc<ApiState>>,
    Json(body): Json<DurationsBody>,
) -> Result<Json<ApiResponse>, ApiError> {
    api.submit(Request::UpdateDurations {
        alarm_seconds: body.alarm_seconds,
        warning_seconds: body.warning_seconds,
    })
    .await?;
    Ok(Json(ApiResponse::ok("Alarm durations saved")))
}

/// Handle GET /status - Return every court's state
pub async fn status_handler(State(api): State<Arc<ApiState>>) -> Result<Json<StatusResponse>, ApiError> {
    match api.submit(Request::Status).await? {
        Reply::Status(report) => Ok(Json(StatusResponse {
            report,
            uptime: api.get_uptime(),
            timestamp: Utc::now(),
        })),
        Reply::Ack => {
            error!("Status request answered without a report");
            Err(ApiError::Unavailable)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
