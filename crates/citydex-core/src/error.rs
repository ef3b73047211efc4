// crates/citydex-core/src/error.rs

use std::sync::Arc;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Shared error cause.
///
/// Fetch results are fanned out to every caller coalesced onto one in-flight
/// load, so the error must be `Clone`; Arc-wrapping the cause keeps the
/// original error chain intact.
pub type SharedCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to fetch and decode the city dataset.
///
/// The catalog wraps every provider failure in this type and does not
/// distinguish the subtypes further; callers decide whether to retry.
/// A failed load is never cached — the next call hits the provider again.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Network or I/O failure reaching the record source.
    #[error("transport failure: {0}")]
    Transport(#[source] SharedCause),

    /// The server answered outside the 2xx range.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The payload could not be decoded as a city record collection.
    #[error("failed to decode city records: {0}")]
    Decode(#[source] SharedCause),
}

impl FetchError {
    pub fn transport(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(cause))
    }

    pub fn decode(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(cause))
    }
}

/// Failure inside a [`BlobStore`](crate::storage::BlobStore) implementation.
///
/// The favorites store treats write failures as non-fatal (the in-memory set
/// stays authoritative for the rest of the process), so this surfaces mainly
/// through logs and through direct `BlobStore` users.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read blob {key:?}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write blob {key:?}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
