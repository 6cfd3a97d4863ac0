//! Main application state: the four courts and the shared collaborators

use serde::Serialize;
use tracing::{error, info, trace};

use super::{
    alarm_state::AlarmCoordinator,
    court::{CourtId, COURT_COUNT},
    settings::{validate_duration_minutes, validate_player_name, Settings},
    timer_state::{TimerEvent, TimerState},
};
use crate::{
    error::CoreError,
    services::{AudioChannel, ClipOwner, Indicators, SettingsStore},
};

/// Control requests accepted by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Start { court: usize, duration_minutes: u32, player_name: String },
    PauseOrResume { court: usize },
    Stop { court: usize },
    UpdateSettings { court: usize, volume: u8, warning_lead_minutes: u32, loop_alarm: bool },
    UpdateGlobalVolume { volume: u8 },
    UpdateDurations { alarm_seconds: u32, warning_seconds: u32 },
    Status,
}

/// Successful outcome of a request
#[derive(Debug, Clone)]
pub enum Reply {
    Ack,
    Status(StatusReport),
}

/// Status of one court
#[derive(Debug, Clone, Serialize)]
pub struct CourtStatus {
    pub court: CourtId,
    pub remaining_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub player_name: String,
    pub session_count: u32,
    pub total_play_seconds: u64,
    pub alarm_active: bool,
    pub alarm_is_warning: bool,
}

/// Snapshot of every court plus device-wide state
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub courts: Vec<CourtStatus>,
    pub audio_owner: Option<ClipOwner>,
    pub settings: Settings,
}

/// All core state, owned by the poll loop
pub struct AppState {
    timers: [TimerState; COURT_COUNT],
    settings: Settings,
    store: Box<dyn SettingsStore>,
    alarms: AlarmCoordinator,
    audio: AudioChannel,
}

impl AppState {
    /// Create the core with every court idle
    pub fn new(
        settings: Settings,
        store: Box<dyn SettingsStore>,
        audio: AudioChannel,
        indicators: Box<dyn Indicators>,
    ) -> Self {
        Self {
            timers: Default::default(),
            settings,
            store,
            alarms: AlarmCoordinator::new(indicators),
            audio,
        }
    }

    /// One scheduling pass: timers, then alarms, then the audio channel
    pub fn tick(&mut self, now: u64) {
        let mut events: [Option<TimerEvent>; COURT_COUNT] = [None; COURT_COUNT];
        for court in CourtId::all() {
            let lead = self.settings.court(court).warning_lead_ms();
            events[court.index()] = self.timers[court.index()].tick(now, lead);
        }

        trace!("tick at {}ms: {:?}", now, events);
        self.alarms.tick(now, &events, &self.settings, &mut self.audio);
        self.audio.tick();
    }

    /// Handle one control request
    pub fn handle(&mut self, now: u64, request: Request) -> Result<Reply, CoreError> {
        match request {
            Request::Start { court, duration_minutes, player_name } => {
                self.start(now, court, duration_minutes, &player_name)?;
            }
            Request::PauseOrResume { court } => self.pause_or_resume(now, court)?,
            Request::Stop { court } => self.stop(now, court)?,
            Request::UpdateSettings { court, volume, warning_lead_minutes, loop_alarm } => {
                let court = CourtId::new(court)?;
                self.settings.update_court(court, volume, warning_lead_minutes, loop_alarm)?;
                info!(
                    "{} settings: volume={}, warning lead={}min, loop={}",
                    court, volume, warning_lead_minutes, loop_alarm
                );
                self.persist()?;
            }
            Request::UpdateGlobalVolume { volume } => {
                self.settings.update_global_volume(volume)?;
                info!("Global volume set to {}", volume);
                self.persist()?;
            }
            Request::UpdateDurations { alarm_seconds, warning_seconds } => {
                self.settings.update_durations(alarm_seconds, warning_seconds)?;
                info!("Alarm durations set to {}s expiry, {}s warning", alarm_seconds, warning_seconds);
                self.persist()?;
            }
            Request::Status => return Ok(Reply::Status(self.status(now))),
        }
        Ok(Reply::Ack)
    }

    /// Start (or restart) a court's countdown
    pub fn start(&mut self, now: u64, court: usize, duration_minutes: u32, player_name: &str) -> Result<(), CoreError> {
        let court = CourtId::new(court)?;
        validate_duration_minutes(duration_minutes)?;
        validate_player_name(player_name)?;

        // A new run silences whatever the previous run left ringing
        self.alarms.stop(court, &mut self.audio);
        info!("Starting {} for {}min", court, duration_minutes);
        self.timers[court.index()].start(now, u64::from(duration_minutes) * 60, player_name);
        Ok(())
    }

    pub fn pause_or_resume(&mut self, now: u64, court: usize) -> Result<(), CoreError> {
        let court = CourtId::new(court)?;
        self.timers[court.index()].toggle_pause(now);
        Ok(())
    }

    /// Stop a court's countdown and its alarm
    pub fn stop(&mut self, now: u64, court: usize) -> Result<(), CoreError> {
        let court = CourtId::new(court)?;
        info!("Stopping {}", court);
        self.timers[court.index()].stop(now);
        self.alarms.stop(court, &mut self.audio);
        Ok(())
    }

    pub fn status(&self, now: u64) -> StatusReport {
        let courts = CourtId::all()
            .map(|court| {
                let timer = &self.timers[court.index()];
                let alarm = self.alarms.alarm(court);
                CourtStatus {
                    court,
                    remaining_seconds: timer.remaining_seconds(),
                    running: timer.is_running(),
                    paused: timer.is_paused(),
                    player_name: timer.player_name().to_string(),
                    session_count: timer.session_count(),
                    total_play_seconds: timer.total_play_ms(now) / 1000,
                    alarm_active: alarm.active,
                    alarm_is_warning: alarm.active && alarm.is_warning,
                }
            })
            .collect();

        StatusReport {
            courts,
            audio_owner: self.audio.owner(),
            settings: self.settings.clone(),
        }
    }

    pub fn timer(&self, court: CourtId) -> &TimerState {
        &self.timers[court.index()]
    }

    pub fn alarms(&self) -> &AlarmCoordinator {
        &self.alarms
    }

    pub fn audio(&self) -> &AudioChannel {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Write settings through; in-memory state stays authoritative on failure
    fn persist(&mut self) -> Result<(), CoreError> {
        self.store.save(&self.settings).map_err(|e| {
            error!("Failed to persist settings: {}", e);
            CoreError::Persist(e)
        })
    }
}
