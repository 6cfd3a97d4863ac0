//! Per-court LED outputs

use tracing::debug;

use crate::state::{CourtId, COURT_COUNT};

/// Binary on/off output per court. Write-only.
pub trait Indicators: Send {
    fn set(&mut self, court: CourtId, on: bool);
}

/// Indicator set that reports LED changes through the log
#[derive(Debug, Default)]
pub struct LogIndicators {
    lit: [bool; COURT_COUNT],
}

impl Indicators for LogIndicators {
    fn set(&mut self, court: CourtId, on: bool) {
        let slot = &mut self.lit[court.index()];
        if *slot != on {
            debug!("{} LED {}", court, if on { "on" } else { "off" });
        }
        *slot = on;
    }
}
