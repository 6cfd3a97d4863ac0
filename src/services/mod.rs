//! Hardware and storage collaborators
//!
//! This module contains the shared audio channel, clip storage backends,
//! the LED indicator outputs and the persisted settings store.

pub mod audio;
pub mod indicators;
pub mod settings_store;
pub mod storage;

// Re-export main types
pub use audio::{AudioChannel, AudioOutput, ClipKind, ClipOwner, SilentOutput};
pub use indicators::{Indicators, LogIndicators};
pub use settings_store::{load_or_default, JsonFileStore, SettingsStore};
pub use storage::{ClipDecoder, ClipStorage, DirectoryStorage, MemoryStorage, StreamDecoder};
