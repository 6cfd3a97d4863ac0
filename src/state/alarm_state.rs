//! Alarm slots and the coordinator that arbitrates the shared audio channel
//!
//! Timer events activate a court's alarm: its LED goes on and its clip is
//! requested on the audio channel, preempting whichever court held it. When
//! the alarm window elapses the alarm either loops (re-asserting the channel)
//! or deactivates, stopping the audio only if the court still owns it.

use tracing::{debug, info, warn};

use super::{
    court::{CourtId, COURT_COUNT},
    settings::Settings,
    timer_state::TimerEvent,
};
use crate::services::{AudioChannel, ClipKind, ClipOwner, Indicators};

/// Alarm bookkeeping for one court
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmState {
    pub active: bool,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub is_warning: bool,
    pub looping: bool,
}

impl AlarmState {
    fn kind(&self) -> ClipKind {
        ClipKind::from_warning(self.is_warning)
    }
}

/// Owns the per-court alarm slots and the LED outputs
pub struct AlarmCoordinator {
    alarms: [AlarmState; COURT_COUNT],
    indicators: Box<dyn Indicators>,
}

impl AlarmCoordinator {
    pub fn new(indicators: Box<dyn Indicators>) -> Self {
        Self {
            alarms: [AlarmState::default(); COURT_COUNT],
            indicators,
        }
    }

    /// Raise this tick's timer events, then service alarm windows, each in court order
    pub fn tick(
        &mut self,
        now: u64,
        events: &[Option<TimerEvent>; COURT_COUNT],
        settings: &Settings,
        audio: &mut AudioChannel,
    ) {
        for court in CourtId::all() {
            if let Some(event) = events[court.index()] {
                self.raise(court, event, now, settings, audio);
            }
        }

        // Loop restarts run after every new event so a re-assert wins the channel
        for court in CourtId::all() {
            self.service_window(court, now, settings, audio);
        }
    }

    /// Activate a court's alarm in response to a timer event
    pub fn raise(
        &mut self,
        court: CourtId,
        event: TimerEvent,
        now: u64,
        settings: &Settings,
        audio: &mut AudioChannel,
    ) {
        let is_warning = event == TimerEvent::WarningCrossed;
        self.alarms[court.index()] = AlarmState {
            active: true,
            start_ms: now,
            duration_ms: settings.alarm_window_ms(is_warning),
            is_warning,
            looping: settings.court(court).loop_alarm,
        };
        self.indicators.set(court, true);

        info!(
            "{} {} alarm raised",
            court,
            if is_warning { "warning" } else { "expiry" }
        );
        self.request_audio(court, settings, audio);
    }

    /// Force a court's alarm idle
    pub fn stop(&mut self, court: CourtId, audio: &mut AudioChannel) {
        if self.alarms[court.index()].active {
            info!("{} alarm stopped", court);
        }
        self.deactivate(court, audio);
    }

    pub fn alarm(&self, court: CourtId) -> &AlarmState {
        &self.alarms[court.index()]
    }

    fn service_window(&mut self, court: CourtId, now: u64, settings: &Settings, audio: &mut AudioChannel) {
        let alarm = &mut self.alarms[court.index()];
        if !alarm.active || now.saturating_sub(alarm.start_ms) < alarm.duration_ms {
            return;
        }

        if alarm.looping && settings.court(court).loop_alarm {
            alarm.start_ms = now;
            debug!("{} alarm window restarted", court);
            // Re-assert even if our clip is still live: another court may have taken the channel
            self.request_audio(court, settings, audio);
        } else {
            info!("{} alarm window elapsed", court);
            self.deactivate(court, audio);
        }
    }

    fn deactivate(&mut self, court: CourtId, audio: &mut AudioChannel) {
        self.alarms[court.index()].active = false;
        self.indicators.set(court, false);
        if audio.is_owned_by(court) {
            audio.stop();
        }
    }

    fn request_audio(&self, court: CourtId, settings: &Settings, audio: &mut AudioChannel) {
        let owner = ClipOwner {
            court,
            kind: self.alarms[court.index()].kind(),
        };
        // The LED stays on even when no clip can be played
        if let Err(e) = audio.play(owner, settings.effective_volume(court)) {
            warn!("No audio for {} alarm: {}", court, e);
        }
    }
}
