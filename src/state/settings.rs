//! Persisted device and per-court settings

use serde::{Deserialize, Serialize};

use super::court::{CourtId, COURT_COUNT};
use crate::error::CoreError;

/// Highest volume step the audio output accepts
pub const MAX_VOLUME: u8 = 21;
/// Longest accepted countdown, in minutes
pub const MAX_DURATION_MINUTES: u32 = 240;
/// Longest accepted warning lead, in minutes
pub const MAX_WARNING_LEAD_MINUTES: u32 = 60;
/// Longest accepted alarm window, in seconds
pub const MAX_ALARM_SECONDS: u32 = 600;
/// Longest accepted player name, in characters
pub const MAX_PLAYER_NAME_CHARS: usize = 32;

/// Settings for a single court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtSettings {
    pub volume: u8,
    pub warning_lead_secs: u32,
    pub loop_alarm: bool,
}

impl Default for CourtSettings {
    fn default() -> Self {
        Self {
            volume: 15,
            warning_lead_secs: 5 * 60,
            loop_alarm: false,
        }
    }
}

impl CourtSettings {
    pub fn warning_lead_ms(&self) -> u64 {
        u64::from(self.warning_lead_secs) * 1000
    }
}

/// Device-wide settings, loaded at startup and written through on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub global_volume: u8,
    /// Length of the expiry alarm window
    pub alarm_seconds: u32,
    /// Length of the warning alarm window
    pub warning_seconds: u32,
    pub courts: [CourtSettings; COURT_COUNT],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global_volume: 15,
            alarm_seconds: 10,
            warning_seconds: 5,
            courts: [CourtSettings::default(); COURT_COUNT],
        }
    }
}

impl Settings {
    pub fn court(&self, court: CourtId) -> &CourtSettings {
        &self.courts[court.index()]
    }

    /// Volume a court's clip plays at, capped by the global volume
    pub fn effective_volume(&self, court: CourtId) -> u8 {
        self.court(court).volume.min(self.global_volume)
    }

    /// Alarm window for a warning or expiry alarm, in milliseconds
    pub fn alarm_window_ms(&self, is_warning: bool) -> u64 {
        let secs = if is_warning { self.warning_seconds } else { self.alarm_seconds };
        u64::from(secs) * 1000
    }

    /// Validate and apply a court settings update
    pub fn update_court(
        &mut self,
        court: CourtId,
        volume: u8,
        warning_lead_minutes: u32,
        loop_alarm: bool,
    ) -> Result<(), CoreError> {
        validate_volume(volume)?;
        if warning_lead_minutes > MAX_WARNING_LEAD_MINUTES {
            return Err(CoreError::InvalidWarningLead(warning_lead_minutes));
        }

        self.courts[court.index()] = CourtSettings {
            volume,
            warning_lead_secs: warning_lead_minutes * 60,
            loop_alarm,
        };
        Ok(())
    }

    pub fn update_global_volume(&mut self, volume: u8) -> Result<(), CoreError> {
        validate_volume(volume)?;
        self.global_volume = volume;
        Ok(())
    }

    pub fn update_durations(&mut self, alarm_seconds: u32, warning_seconds: u32) -> Result<(), CoreError> {
        validate_alarm_durations(alarm_seconds, warning_seconds)?;
        self.alarm_seconds = alarm_seconds;
        self.warning_seconds = warning_seconds;
        Ok(())
    }

    /// Check every field against the ranges the update methods enforce
    ///
    /// Used on settings that did not come through an update, e.g. a stored document.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_volume(self.global_volume)?;
        validate_alarm_durations(self.alarm_seconds, self.warning_seconds)?;

        for court in &self.courts {
            validate_volume(court.volume)?;
            if court.warning_lead_secs > MAX_WARNING_LEAD_MINUTES * 60 {
                return Err(CoreError::InvalidWarningLead(court.warning_lead_secs.div_ceil(60)));
            }
        }
        Ok(())
    }
}

/// Check a requested countdown length
pub fn validate_duration_minutes(minutes: u32) -> Result<(), CoreError> {
    if (1..=MAX_DURATION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(CoreError::InvalidDuration(minutes))
    }
}

/// Check a player name before it is attached to a run
pub fn validate_player_name(name: &str) -> Result<(), CoreError> {
    let chars = name.chars().count();
    if chars <= MAX_PLAYER_NAME_CHARS {
        Ok(())
    } else {
        Err(CoreError::InvalidPlayerName(chars))
    }
}

fn validate_alarm_durations(alarm_seconds: u32, warning_seconds: u32) -> Result<(), CoreError> {
    let in_range = |secs: u32| (1..=MAX_ALARM_SECONDS).contains(&secs);
    if in_range(alarm_seconds) && in_range(warning_seconds) {
        Ok(())
    } else {
        Err(CoreError::InvalidAlarmDurations { alarm_seconds, warning_seconds })
    }
}

fn validate_volume(volume: u8) -> Result<(), CoreError> {
    if volume <= MAX_VOLUME {
        Ok(())
    } else {
        Err(CoreError::InvalidVolume(volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn court(index: usize) -> CourtId {
        CourtId::new(index).unwrap()
    }

    #[test]
    fn effective_volume_is_capped_by_global() {
        let mut settings = Settings::default();
        settings.update_court(court(1), 20, 2, false).unwrap();
        settings.update_global_volume(8).unwrap();

        assert_eq!(settings.effective_volume(court(1)), 8);
        assert_eq!(settings.court(court(1)).warning_lead_secs, 120);
    }

    #[test]
    fn rejected_updates_leave_settings_untouched() {
        let mut settings = Settings::default();
        let before = settings.clone();

        assert!(matches!(
            settings.update_court(court(0), 22, 1, true),
            Err(CoreError::InvalidVolume(22))
        ));
        assert!(matches!(
            settings.update_court(court(0), 5, 61, true),
            Err(CoreError::InvalidWarningLead(61))
        ));
        assert!(settings.update_durations(0, 5).is_err());
        assert!(settings.update_durations(5, 601).is_err());
        assert_eq!(settings, before);
    }

    #[test]
    fn duration_bounds() {
        assert!(validate_duration_minutes(0).is_err());
        assert!(validate_duration_minutes(1).is_ok());
        assert!(validate_duration_minutes(MAX_DURATION_MINUTES).is_ok());
        assert!(validate_duration_minutes(MAX_DURATION_MINUTES + 1).is_err());
    }

    #[test]
    fn player_name_bound_counts_characters() {
        assert!(validate_player_name("").is_ok());
        assert!(validate_player_name(&"é".repeat(MAX_PLAYER_NAME_CHARS)).is_ok());
        assert!(matches!(
            validate_player_name(&"x".repeat(MAX_PLAYER_NAME_CHARS + 1)),
            Err(CoreError::InvalidPlayerName(33))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert!(Settings::default().validate().is_ok());

        let mut settings = Settings::default();
        settings.global_volume = 250;
        assert!(matches!(settings.validate(), Err(CoreError::InvalidVolume(250))));

        let mut settings = Settings::default();
        settings.courts[3].volume = MAX_VOLUME + 1;
        assert!(matches!(settings.validate(), Err(CoreError::InvalidVolume(22))));

        let mut settings = Settings::default();
        settings.alarm_seconds = 0;
        assert!(matches!(settings.validate(), Err(CoreError::InvalidAlarmDurations { .. })));

        let mut settings = Settings::default();
        settings.courts[1].warning_lead_secs = MAX_WARNING_LEAD_MINUTES * 60 + 1;
        assert!(matches!(settings.validate(), Err(CoreError::InvalidWarningLead(61))));

        let mut settings = Settings::default();
        settings.courts[1].warning_lead_secs = MAX_WARNING_LEAD_MINUTES * 60;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"global_volume": 3}"#).unwrap();
        assert_eq!(settings.global_volume, 3);
        assert_eq!(settings.alarm_seconds, 10);
        assert_eq!(settings.courts[2], CourtSettings::default());
    }
}
