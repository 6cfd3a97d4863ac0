//! Cooperative poll loop
//!
//! The only place core state is mutated. Every period it advances the
//! timers, alarms and audio channel, then handles one batch of queued
//! requests. Timing comes from the clock, so a slow pass only delays
//! observation, never accumulates drift.

use std::time::Duration;
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::control::Envelope;
use crate::{state::AppState, utils::Clock};

/// Most requests handled between two ticks
pub const REQUEST_BATCH: usize = 8;

/// Run one tick and then service up to `REQUEST_BATCH` requests
///
/// Returns false once every request sender has been dropped.
pub fn poll_once(state: &mut AppState, clock: &dyn Clock, requests: &mut mpsc::Receiver<Envelope>) -> bool {
    state.tick(clock.now_ms());

    for _ in 0..REQUEST_BATCH {
        match requests.try_recv() {
            Ok(Envelope { request, reply }) => {
                debug!("Handling request: {:?}", request);
                let result = state.handle(clock.now_ms(), request);
                if let Err(e) = &result {
                    warn!("Request rejected: {}", e);
                }
                if reply.send(result).is_err() {
                    debug!("Requester went away before the reply was sent");
                }
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
    true
}

/// Drive the core forever at a fixed period
pub async fn poll_loop<C: Clock>(mut state: AppState, clock: C, mut requests: mpsc::Receiver<Envelope>, period: Duration) {
    info!("Starting poll loop every {:?}", period);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut accepting = true;

    loop {
        ticker.tick().await;

        if accepting {
            accepting = poll_once(&mut state, &clock, &mut requests);
            if !accepting {
                info!("Request channel closed, timers keep running");
            }
        } else {
            state.tick(clock.now_ms());
        }
    }
}
