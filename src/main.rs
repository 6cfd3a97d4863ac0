//! Court Timer - polled countdown timers for four courts
//!
//! This is the main entry point for the court-timer application.

use tokio::net::TcpListener;
use tracing::info;

use court_timer::{
    api::create_router,
    config::Config,
    services::{load_or_default, AudioChannel, ClipStorage, DirectoryStorage, JsonFileStore, LogIndicators, SilentOutput},
    state::AppState,
    tasks::{control_channel, poll_loop, REQUEST_QUEUE_DEPTH},
    utils::{shutdown_signal, MonotonicClock},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("court_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting court-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, settings={}",
        config.host,
        config.port,
        config.tick_ms,
        config.settings.display()
    );

    let store = JsonFileStore::new(config.settings.clone());
    let settings = load_or_default(&store);

    let backends: Vec<Box<dyn ClipStorage>> = config
        .clips_dirs
        .iter()
        .map(|dir| Box::new(DirectoryStorage::new(dir.clone())) as Box<dyn ClipStorage>)
        .collect();
    for backend in &backends {
        if !backend.is_available() {
            tracing::warn!("Clip directory {} is not available", backend.label());
        }
    }
    let audio = AudioChannel::new(backends, config.fallback_clip.clone(), Box::new(SilentOutput::default()));

    let state = AppState::new(settings, Box::new(store), audio, Box::new(LogIndicators::default()));
    let (control, requests) = control_channel(REQUEST_QUEUE_DEPTH);

    // Create HTTP router with all endpoints
    let app = create_router(control);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /courts/:court/start    - Start a countdown");
    info!("  POST /courts/:court/pause    - Pause or resume a countdown");
    info!("  POST /courts/:court/stop     - Stop a countdown and its alarm");
    info!("  POST /courts/:court/settings - Update court settings");
    info!("  POST /settings/volume        - Update global volume");
    info!("  POST /settings/durations     - Update alarm durations");
    info!("  GET  /status                 - Check every court");
    info!("  GET  /health                 - Health check");

    // The poll loop runs on this task; the server only forwards requests to it
    let server = axum::serve(listener, app);

    tokio::select! {
        _ = poll_loop(state, MonotonicClock::new(), requests, config.tick_period()) => {}
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
