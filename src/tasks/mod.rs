//! Scheduling module
//!
//! This module contains the poll loop that owns the core and the request
//! channel the HTTP layer uses to reach it.

pub mod control;
pub mod poll_loop;

// Re-export main items
pub use control::{control_channel, ControlHandle, Envelope, LoopGone, REQUEST_QUEUE_DEPTH};
pub use poll_loop::{poll_loop, poll_once, REQUEST_BATCH};
