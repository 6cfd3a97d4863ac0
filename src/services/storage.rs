//! Clip storage backends and sequential clip decoders

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Cursor, ErrorKind, Read},
    path::PathBuf,
    sync::Arc,
};
use tracing::trace;

use super::audio::AudioOutput;
use crate::error::ClipError;

/// Bytes handed to the output per decoder pump
pub const CHUNK_BYTES: usize = 4096;

/// Sequential decoder over one opened clip
pub trait ClipDecoder: Send {
    /// Feed the next chunk to `output`. Returns `Ok(false)` once the clip is exhausted.
    fn pump(&mut self, output: &mut dyn AudioOutput) -> Result<bool, ClipError>;
}

/// A medium that clips can be opened from
pub trait ClipStorage: Send {
    /// Short label used in logs
    fn label(&self) -> String;

    /// Whether the medium is currently mounted/reachable
    fn is_available(&self) -> bool;

    /// Open a clip by name, `ClipError::NotFound` when it is absent
    fn open(&self, clip: &str) -> Result<Box<dyn ClipDecoder>, ClipError>;
}

/// Decoder that streams raw bytes from any reader in fixed-size chunks
pub struct StreamDecoder<R> {
    name: String,
    reader: R,
    buf: Box<[u8]>,
}

impl<R: Read + Send> StreamDecoder<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            buf: vec![0; CHUNK_BYTES].into_boxed_slice(),
        }
    }
}

impl<R: Read + Send> ClipDecoder for StreamDecoder<R> {
    fn pump(&mut self, output: &mut dyn AudioOutput) -> Result<bool, ClipError> {
        let read = loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ClipError::Decode {
                        name: self.name.clone(),
                        source,
                    })
                }
            }
        };

        if read == 0 {
            return Ok(false);
        }

        trace!("{}: {} bytes", self.name, read);
        output.write(&self.buf[..read]);
        Ok(true)
    }
}

/// Clips stored as files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ClipStorage for DirectoryStorage {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn open(&self, clip: &str) -> Result<Box<dyn ClipDecoder>, ClipError> {
        let path = self.root.join(clip);
        if !path.is_file() {
            return Err(ClipError::NotFound(clip.to_string()));
        }

        let file = File::open(&path).map_err(|source| ClipError::Open {
            name: clip.to_string(),
            source,
        })?;
        Ok(Box::new(StreamDecoder::new(clip, BufReader::new(file))))
    }
}

/// Clips held in memory, e.g. compiled into the firmware image
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    clips: HashMap<String, Arc<[u8]>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        self.clips.insert(name.into(), data.into());
    }
}

impl ClipStorage for MemoryStorage {
    fn label(&self) -> String {
        "memory".to_string()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn open(&self, clip: &str) -> Result<Box<dyn ClipDecoder>, ClipError> {
        let data = self
            .clips
            .get(clip)
            .ok_or_else(|| ClipError::NotFound(clip.to_string()))?;
        Ok(Box::new(StreamDecoder::new(clip, Cursor::new(Arc::clone(data)))))
    }
}
