//! Court Timer - polled countdown timers for four courts
//!
//! Each court runs an independent countdown that raises a warning and an
//! expiry alarm. Alarms light the court's LED and compete for one shared
//! audio channel, where the most recent alarm always wins.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{ClipError, CoreError, StoreError};
pub use state::AppState;
pub use utils::shutdown_signal;
