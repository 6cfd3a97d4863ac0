//! Utility functions module
//!
//! This module contains clock sources and signal handling.

pub mod clock;
pub mod signals;

// Re-export main items
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use signals::shutdown_signal;
