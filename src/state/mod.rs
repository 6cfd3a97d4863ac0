//! State management module
//!
//! This module contains the per-court timer and alarm state machines, the
//! settings they read, and the application state that ties them together.

pub mod alarm_state;
pub mod app_state;
pub mod court;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use alarm_state::{AlarmCoordinator, AlarmState};
pub use app_state::{AppState, CourtStatus, Reply, Request, StatusReport};
pub use court::{CourtId, COURT_COUNT};
pub use settings::{CourtSettings, Settings, MAX_PLAYER_NAME_CHARS};
pub use timer_state::{Latch, TimerEvent, TimerState};
