//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "court-timer")]
#[command(about = "Multi-court countdown timers with LED and audio alarms")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Poll loop period in milliseconds
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: u64,

    /// Path of the persisted settings file
    #[arg(long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Directories searched for alarm clips, in order
    #[arg(long = "clips-dir", default_value = "clips")]
    pub clips_dirs: Vec<PathBuf>,

    /// Clip played when a court has no clip of its own
    #[arg(long, default_value = "alarm.mp3")]
    pub fallback_clip: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
