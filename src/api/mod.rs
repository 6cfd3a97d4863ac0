//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.
//! Handlers never touch core state; they forward requests to the poll loop.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::tasks::ControlHandle;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(control: ControlHandle) -> Router {
    let state = Arc::new(ApiState::new(control));

    Router::new()
        .route("/courts/:court/start", post(start_handler))
        .route("/courts/:court/pause", post(pause_handler))
        .route("/courts/:court/stop", post(stop_handler))
        .route("/courts/:court/settings", post(court_settings_handler))
        .route("/settings/volume", post(volume_handler))
        .route("/settings/durations", post(durations_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
