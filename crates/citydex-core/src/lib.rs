// crates/citydex-core/src/lib.rs

//! # citydex-core
//!
//! The indexing and retrieval core behind the citydex city browser:
//!
//! - [`PrefixIndex`] — a trie over normalized name keys (pure data structure).
//! - [`CityCatalog`] — fetches, sorts and caches the city dataset and serves
//!   prefix queries from an index built over it.
//! - [`FavoritesStore`] — the persisted set of favorited city ids, with
//!   change notification fan-out.
//! - [`SearchService`] — a read-only façade over the catalog for consumers
//!   that must not be able to mutate anything.
//!
//! Transport (HTTP or local file) and persistence (byte blobs per key) are
//! pluggable collaborators behind the [`RecordProvider`] and [`BlobStore`]
//! traits.

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod model;
pub mod provider;
pub mod search;
pub mod storage;
pub mod text;
pub mod trie;

// Re-exports
pub use crate::catalog::{CatalogStats, CityCatalog};
pub use crate::error::{FetchError, PersistenceError, Result};
pub use crate::favorites::{FavoritesStore, Subscription};
pub use crate::model::{City, CityRecord, Coordinate};
#[cfg(feature = "fetch")]
pub use crate::provider::HttpRecordProvider;
pub use crate::provider::{FileRecordProvider, RecordProvider};
pub use crate::search::SearchService;
pub use crate::storage::{BlobStore, FileStore, MemoryStore};
pub use crate::trie::PrefixIndex;
