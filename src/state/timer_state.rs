//! Per-court countdown timer state machine

use serde::Serialize;
use tracing::info;

/// One-shot latch that fires at most once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Latch {
    #[default]
    Armed,
    Fired,
}

impl Latch {
    /// Fire the latch, returning true only on the first call since it was armed
    fn fire(&mut self) -> bool {
        match self {
            Latch::Armed => {
                *self = Latch::Fired;
                true
            }
            Latch::Fired => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        *self == Latch::Fired
    }
}

/// Edge-triggered transitions raised by `TimerState::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    WarningCrossed,
    Expired,
}

/// Countdown state for one court
#[derive(Debug, Clone, Default)]
pub struct TimerState {
    running: bool,
    paused: bool,
    start_ms: u64,
    pause_ms: u64,
    duration_ms: u64,
    remaining_ms: u64,
    warning: Latch,
    expiry: Latch,
    player_name: String,
    session_count: u32,
    total_play_ms: u64,
}

impl TimerState {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, discarding any run in progress
    ///
    /// `duration_secs` must be non-zero; callers validate it at the request
    /// boundary, a zero duration expires on the first tick.
    pub fn start(&mut self, now: u64, duration_secs: u64, player_name: &str) {
        if self.running {
            self.total_play_ms += self.elapsed_ms(now);
        }

        self.running = true;
        self.paused = false;
        self.start_ms = now;
        self.pause_ms = 0;
        self.duration_ms = duration_secs * 1000;
        self.remaining_ms = self.duration_ms;
        self.warning = Latch::Armed;
        self.expiry = Latch::Armed;
        self.player_name = player_name.to_string();
        self.session_count += 1;

        info!(
            "Timer started for {} ({}s, session {})",
            self.player_name, duration_secs, self.session_count
        );
    }

    /// Pause a running timer or resume a paused one; no-op when idle
    pub fn toggle_pause(&mut self, now: u64) {
        if !self.running {
            return;
        }

        if self.paused {
            // Shift the start forward so the pause window is excluded from elapsed time
            self.start_ms += now.saturating_sub(self.pause_ms);
            self.paused = false;
            info!("Timer resumed with {}ms remaining", self.remaining_ms);
        } else {
            self.pause_ms = now;
            self.paused = true;
            info!("Timer paused with {}ms remaining", self.remaining_ms);
        }
    }

    /// Force the timer idle
    pub fn stop(&mut self, now: u64) {
        if self.running {
            self.total_play_ms += self.elapsed_ms(now);
        }
        self.running = false;
        self.paused = false;
        self.remaining_ms = 0;
    }

    /// Advance the countdown and report at most one transition
    pub fn tick(&mut self, now: u64, warning_lead_ms: u64) -> Option<TimerEvent> {
        if !self.running || self.paused {
            return None;
        }

        let elapsed = now.saturating_sub(self.start_ms);
        self.remaining_ms = self.duration_ms.saturating_sub(elapsed);

        if self.remaining_ms == 0 {
            self.running = false;
            self.total_play_ms += self.duration_ms;
            if self.expiry.fire() {
                return Some(TimerEvent::Expired);
            }
            return None;
        }

        if self.remaining_ms <= warning_lead_ms && self.warning.fire() {
            return Some(TimerEvent::WarningCrossed);
        }

        None
    }

    /// Unpaused time spent in the current run
    fn elapsed_ms(&self, now: u64) -> u64 {
        let until = if self.paused { self.pause_ms } else { now };
        until
            .saturating_sub(self.start_ms)
            .min(self.duration_ms)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining_ms(&self) -> u64 {
        if self.running {
            self.remaining_ms
        } else {
            0
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_ms() / 1000
    }

    pub fn warning(&self) -> Latch {
        self.warning
    }

    pub fn expiry(&self) -> Latch {
        self.expiry
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    /// Cumulative play time including the run in progress
    pub fn total_play_ms(&self, now: u64) -> u64 {
        if self.running {
            self.total_play_ms + self.elapsed_ms(now)
        } else {
            self.total_play_ms
        }
    }
}
