// crates/citydex-core/src/storage.rs

//! Opaque byte-blob persistence used by the favorites store.
//!
//! A [`BlobStore`] knows two things: read the bytes for a key (absent if never
//! written) and write the bytes for a key, durable on return. What the bytes
//! mean is the caller's business.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::PersistenceError;

/// Synchronous key → byte-blob storage.
pub trait BlobStore: Send + Sync {
    /// Bytes previously written under `key`, or `None` if never written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Write `bytes` under `key`; assumed durable when this returns.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError>;
}

/// In-memory store for tests, demos and previews. Nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// File-backed store: one file per key under a root directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are dotted identifiers ("citydex.favorites"); keep them usable
        // as plain file names.
        let file: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(file)
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        let wrap = |source| PersistenceError::Write {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.root).map_err(wrap)?;
        std::fs::write(self.path_for(key), bytes).map_err(wrap)
    }
}
