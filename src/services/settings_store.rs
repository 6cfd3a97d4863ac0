//! Persisted settings storage

use std::{fs, io::ErrorKind, path::PathBuf};
use tracing::{info, warn};

use crate::{error::StoreError, state::Settings};

/// Backing store for device settings
pub trait SettingsStore: Send {
    /// Read stored settings, `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Settings>, StoreError>;

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError>;
}

/// Settings kept as a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, raw).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Load settings at startup, falling back to defaults when absent, unreadable
/// or out of range
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(settings)) => match settings.validate() {
            Ok(()) => {
                info!("Loaded persisted settings");
                settings
            }
            Err(e) => {
                warn!("Persisted settings rejected, using defaults: {}", e);
                Settings::default()
            }
        },
        Ok(None) => {
            info!("No persisted settings found, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        }
    }
}
