// crates/citydex-core/src/search.rs

//! Read-only search façade over [`CityCatalog`].
//!
//! Consumers holding a [`SearchService`] can query and load but cannot reach
//! anything mutable — hand this to code that must never toggle favorites or
//! otherwise write.

use std::sync::Arc;

use crate::catalog::CityCatalog;
use crate::error::Result;
use crate::model::City;
use crate::provider::RecordProvider;

/// Narrowed interface over the catalog: prefix search and full load only.
pub struct SearchService<P> {
    catalog: Arc<CityCatalog<P>>,
}

impl<P: RecordProvider> SearchService<P> {
    pub fn new(catalog: Arc<CityCatalog<P>>) -> Self {
        Self { catalog }
    }

    /// Prefix search against the loaded catalog.
    pub fn execute(&self, prefix: &str) -> Vec<City> {
        self.catalog.search_cities(prefix)
    }

    /// Load (or return the cached) full city list; failures propagate
    /// unchanged from the catalog.
    pub async fn load_all_cities(&self) -> Result<Vec<City>> {
        self.catalog.get_all_cities().await
    }
}

impl<P> Clone for SearchService<P> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}
