//! Shared audio channel
//!
//! A single exclusive playback slot. Whoever calls `play` last owns it; there
//! is no queue, a new request stops whatever is live.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::storage::{ClipDecoder, ClipStorage};
use crate::error::ClipError;
use crate::state::CourtId;

/// Which alarm a clip belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipKind {
    Warning,
    Expiry,
}

impl ClipKind {
    pub fn from_warning(is_warning: bool) -> Self {
        if is_warning { ClipKind::Warning } else { ClipKind::Expiry }
    }

    /// Name of the per-court clip, e.g. `court2_warning.mp3`
    pub fn court_clip_name(self, court: CourtId) -> String {
        let suffix = match self {
            ClipKind::Warning => "warning",
            ClipKind::Expiry => "alarm",
        };
        format!("court{}_{}.mp3", court.number(), suffix)
    }
}

/// Current holder of the audio channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipOwner {
    pub court: CourtId,
    pub kind: ClipKind,
}

/// Sink that decoded audio is written to
pub trait AudioOutput: Send {
    fn set_volume(&mut self, volume: u8);

    fn write(&mut self, chunk: &[u8]);

    /// Drop anything buffered for the clip that was just stopped
    fn halt(&mut self) {}
}

/// Output that discards audio, for hosts without a sound device
#[derive(Debug, Default)]
pub struct SilentOutput {
    bytes_written: u64,
}

impl SilentOutput {
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl AudioOutput for SilentOutput {
    fn set_volume(&mut self, volume: u8) {
        trace!("Silent output volume set to {}", volume);
    }

    fn write(&mut self, chunk: &[u8]) {
        self.bytes_written += chunk.len() as u64;
    }
}

struct LivePlayback {
    owner: ClipOwner,
    clip: String,
    decoder: Box<dyn ClipDecoder>,
}

/// The one playback resource shared by all courts
pub struct AudioChannel {
    backends: Vec<Box<dyn ClipStorage>>,
    fallback_clip: String,
    output: Box<dyn AudioOutput>,
    live: Option<LivePlayback>,
}

impl AudioChannel {
    /// Create an idle channel. Backends are searched in order.
    pub fn new(
        backends: Vec<Box<dyn ClipStorage>>,
        fallback_clip: impl Into<String>,
        output: Box<dyn AudioOutput>,
    ) -> Self {
        Self {
            backends,
            fallback_clip: fallback_clip.into(),
            output,
            live: None,
        }
    }

    /// Preempt whatever is playing and start the clip for `owner`
    ///
    /// On failure the channel is left idle.
    pub fn play(&mut self, owner: ClipOwner, volume: u8) -> Result<(), ClipError> {
        self.stop();

        let (clip, decoder) = self.open_clip(owner)?;
        self.output.set_volume(volume);
        info!("Playing {} for {} at volume {}", clip, owner.court, volume);

        self.live = Some(LivePlayback { owner, clip, decoder });
        Ok(())
    }

    /// Release the live clip, if any
    pub fn stop(&mut self) {
        if let Some(live) = self.live.take() {
            debug!("Stopping {} for {}", live.clip, live.owner.court);
            self.output.halt();
        }
    }

    /// Pump the live decoder once, going idle when the clip ends or fails
    pub fn tick(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let finished = match live.decoder.pump(self.output.as_mut()) {
            Ok(true) => false,
            Ok(false) => {
                debug!("{} finished for {}", live.clip, live.owner.court);
                true
            }
            Err(e) => {
                warn!("Playback of {} failed: {}", live.clip, e);
                true
            }
        };

        if finished {
            self.live = None;
        }
    }

    pub fn owner(&self) -> Option<ClipOwner> {
        self.live.as_ref().map(|live| live.owner)
    }

    pub fn is_playing(&self) -> bool {
        self.live.is_some()
    }

    pub fn is_owned_by(&self, court: CourtId) -> bool {
        self.owner().is_some_and(|owner| owner.court == court)
    }

    /// Resolve the per-court clip, then the fallback, across available backends
    fn open_clip(&self, owner: ClipOwner) -> Result<(String, Box<dyn ClipDecoder>), ClipError> {
        let available: Vec<&dyn ClipStorage> = self
            .backends
            .iter()
            .map(|backend| &**backend)
            .filter(|backend| backend.is_available())
            .collect();

        if available.is_empty() {
            return Err(ClipError::NoStorage);
        }

        let court_clip = owner.kind.court_clip_name(owner.court);
        let mut last_error = None;

        for name in [court_clip.as_str(), self.fallback_clip.as_str()] {
            for backend in &available {
                match backend.open(name) {
                    Ok(decoder) => return Ok((name.to_string(), decoder)),
                    Err(ClipError::NotFound(_)) => {
                        trace!("{} not on {}", name, backend.label());
                    }
                    Err(e) => {
                        warn!("Failed to open {} on {}: {}", name, backend.label(), e);
                        last_error = Some(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(ClipError::NotFound(court_clip)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{MemoryStorage, CHUNK_BYTES};

    fn court(index: usize) -> CourtId {
        CourtId::new(index).unwrap()
    }

    fn owner(index: usize, kind: ClipKind) -> ClipOwner {
        ClipOwner { court: court(index), kind }
    }

    fn channel(storage: MemoryStorage) -> AudioChannel {
        AudioChannel::new(vec![Box::new(storage)], "alarm.mp3", Box::new(SilentOutput::default()))
    }

    #[test]
    fn per_court_clip_names() {
        assert_eq!(ClipKind::Warning.court_clip_name(court(0)), "court1_warning.mp3");
        assert_eq!(ClipKind::Expiry.court_clip_name(court(3)), "court4_alarm.mp3");
    }

    #[test]
    fn play_falls_back_to_device_clip() {
        let mut audio = channel(MemoryStorage::new().with_clip("alarm.mp3", vec![1u8; 8]));

        audio.play(owner(2, ClipKind::Warning), 10).unwrap();
        assert_eq!(audio.owner(), Some(owner(2, ClipKind::Warning)));
    }

    #[test]
    fn missing_clips_leave_channel_idle() {
        let mut audio = channel(MemoryStorage::new().with_clip("alarm.mp3", vec![1u8; 8]));
        audio.play(owner(0, ClipKind::Expiry), 10).unwrap();

        audio.fallback_clip = "gone.mp3".to_string();
        assert!(matches!(
            audio.play(owner(1, ClipKind::Expiry), 10),
            Err(ClipError::NotFound(_))
        ));
        assert!(!audio.is_playing());
    }

    #[test]
    fn no_backends_is_reported() {
        let mut audio = AudioChannel::new(Vec::new(), "alarm.mp3", Box::new(SilentOutput::default()));
        assert!(matches!(audio.play(owner(0, ClipKind::Expiry), 10), Err(ClipError::NoStorage)));
    }

    #[test]
    fn play_preempts_previous_owner() {
        let mut audio = channel(
            MemoryStorage::new()
                .with_clip("court1_alarm.mp3", vec![1u8; 8])
                .with_clip("court2_alarm.mp3", vec![2u8; 8]),
        );

        audio.play(owner(0, ClipKind::Expiry), 10).unwrap();
        audio.play(owner(1, ClipKind::Expiry), 10).unwrap();
        assert!(audio.is_owned_by(court(1)));
        assert!(!audio.is_owned_by(court(0)));
    }

    #[test]
    fn tick_goes_idle_when_clip_is_exhausted() {
        let mut audio = channel(MemoryStorage::new().with_clip("alarm.mp3", vec![0u8; CHUNK_BYTES * 2]));
        audio.play(owner(0, ClipKind::Expiry), 10).unwrap();

        audio.tick();
        audio.tick();
        assert!(audio.is_playing());
        audio.tick();
        assert!(!audio.is_playing());
        assert_eq!(audio.owner(), None);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut audio = channel(MemoryStorage::new().with_clip("alarm.mp3", vec![0u8; 8]));
        audio.play(owner(0, ClipKind::Expiry), 10).unwrap();
        audio.stop();
        audio.stop();
        assert!(!audio.is_playing());
    }
}
