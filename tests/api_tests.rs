//! HTTP API tests against a live poll loop

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower::ServiceExt;

use court_timer::{
    api::create_router,
    services::{AudioChannel, JsonFileStore, LogIndicators, MemoryStorage, SilentOutput},
    state::{AppState, Settings, MAX_PLAYER_NAME_CHARS},
    tasks::{control_channel, poll_loop, REQUEST_QUEUE_DEPTH},
    utils::ManualClock,
};

struct Server {
    app: Router,
    clock: ManualClock,
    poller: JoinHandle<()>,
    _dir: tempfile::TempDir,
    settings_path: std::path::PathBuf,
}

fn spawn_server() -> Server {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");

    // No clips at all: alarms must still light up without audio
    let audio = AudioChannel::new(
        vec![Box::new(MemoryStorage::new())],
        "alarm.mp3",
        Box::new(SilentOutput::default()),
    );
    let state = AppState::new(
        Settings::default(),
        Box::new(JsonFileStore::new(&settings_path)),
        audio,
        Box::new(LogIndicators::default()),
    );

    let clock = ManualClock::new(0);
    let (control, requests) = control_channel(REQUEST_QUEUE_DEPTH);
    let poller = tokio::spawn(poll_loop(state, clock.clone(), requests, Duration::from_millis(5)));

    Server {
        app: create_router(control),
        clock,
        poller,
        _dir: dir,
        settings_path,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn status(app: &Router) -> Value {
    let (code, body) = send(app, Method::GET, "/status", None).await;
    assert_eq!(code, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn_server();
    let (code, body) = send(&server.app, Method::GET, "/health", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_then_status_shows_running_court() {
    let server = spawn_server();

    let (code, body) = send(
        &server.app,
        Method::POST,
        "/courts/1/start",
        Some(json!({ "duration_minutes": 30, "player_name": "Mara" })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let body = status(&server.app).await;
    let court = &body["courts"][1];
    assert_eq!(court["running"], true);
    assert_eq!(court["paused"], false);
    assert_eq!(court["player_name"], "Mara");
    assert_eq!(court["session_count"], 1);
    assert_eq!(court["remaining_seconds"], 1800);
    assert_eq!(body["courts"][0]["running"], false);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let server = spawn_server();

    let (code, body) = send(
        &server.app,
        Method::POST,
        "/courts/4/start",
        Some(json!({ "duration_minutes": 5 })),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (code, _) = send(
        &server.app,
        Method::POST,
        "/courts/0/start",
        Some(json!({ "duration_minutes": 0 })),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = send(
        &server.app,
        Method::POST,
        "/courts/0/start",
        Some(json!({ "duration_minutes": 5, "player_name": "x".repeat(MAX_PLAYER_NAME_CHARS + 1) })),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = send(&server.app, Method::POST, "/settings/volume", Some(json!({ "volume": 40 }))).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    assert_eq!(status(&server.app).await["courts"][0]["running"], false);
}

#[tokio::test]
async fn expiry_lights_alarm_without_audio() {
    let server = spawn_server();
    send(
        &server.app,
        Method::POST,
        "/courts/2/start",
        Some(json!({ "duration_minutes": 1, "player_name": "Theo" })),
    )
    .await;

    server.clock.advance(60_000);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let body = status(&server.app).await;
    let court = &body["courts"][2];
    assert_eq!(court["running"], false);
    assert_eq!(court["alarm_active"], true);
    assert_eq!(court["alarm_is_warning"], false);
    assert_eq!(body["audio_owner"], Value::Null);

    let (code, _) = send(&server.app, Method::POST, "/courts/2/stop", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(status(&server.app).await["courts"][2]["alarm_active"], false);
}

#[tokio::test]
async fn pause_freezes_remaining_time() {
    let server = spawn_server();
    send(
        &server.app,
        Method::POST,
        "/courts/3/start",
        Some(json!({ "duration_minutes": 10 })),
    )
    .await;

    server.clock.advance(30_000);
    tokio::time::sleep(Duration::from_millis(30)).await;
    let (code, _) = send(&server.app, Method::POST, "/courts/3/pause", None).await;
    assert_eq!(code, StatusCode::OK);

    server.clock.advance(120_000);
    tokio::time::sleep(Duration::from_millis(30)).await;

    let court = status(&server.app).await["courts"][3].clone();
    assert_eq!(court["paused"], true);
    assert_eq!(court["remaining_seconds"], 570);
}

#[tokio::test]
async fn settings_are_written_through() {
    let server = spawn_server();

    let (code, _) = send(
        &server.app,
        Method::POST,
        "/courts/0/settings",
        Some(json!({ "volume": 9, "warning_lead_minutes": 2, "loop_alarm": true })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);

    let (code, _) = send(
        &server.app,
        Method::POST,
        "/settings/durations",
        Some(json!({ "alarm_seconds": 20, "warning_seconds": 7 })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);

    let saved: Settings = serde_json::from_str(&std::fs::read_to_string(&server.settings_path).unwrap()).unwrap();
    assert_eq!(saved.courts[0].volume, 9);
    assert_eq!(saved.courts[0].warning_lead_secs, 120);
    assert!(saved.courts[0].loop_alarm);
    assert_eq!(saved.alarm_seconds, 20);
    assert_eq!(saved.warning_seconds, 7);
}

#[tokio::test]
async fn stopped_loop_reports_unavailable() {
    let server = spawn_server();
    server.poller.abort();
    let _ = server.poller.await;

    let (code, body) = send(&server.app, Method::POST, "/courts/0/stop", None).await;
    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
}
