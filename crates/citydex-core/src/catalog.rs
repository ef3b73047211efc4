// crates/citydex-core/src/catalog.rs

//! The city catalog: one cached, sorted snapshot of the dataset plus a
//! prefix index built over it.
//!
//! The snapshot and its index live inside a single `Arc` and are replaced as
//! one unit, so a reader can never observe an index built from a different
//! snapshot. Before the first successful load the catalog is simply empty —
//! searches return nothing and never trigger a fetch themselves.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::error::Result;
use crate::model::{City, CityRecord};
use crate::provider::RecordProvider;
use crate::text::fold_key;
use crate::trie::PrefixIndex;

/// Cities sorted for display, with a trie over their folded names.
///
/// The trie stores positions into `cities` rather than city values, so the
/// per-prefix-node duplication costs 4 bytes per entry and search results
/// come back in snapshot (= display) order for free.
struct Snapshot {
    cities: Vec<City>,
    index: PrefixIndex<u32>,
}

impl Snapshot {
    fn build(records: Vec<CityRecord>) -> Self {
        let total = records.len();
        let mut cities: Vec<City> = records.into_iter().filter_map(CityRecord::into_city).collect();
        if cities.len() < total {
            log::warn!("dropped {} invalid city records", total - cities.len());
        }

        cities.sort_by_cached_key(City::sort_key);

        let mut index = PrefixIndex::new();
        for (pos, city) in cities.iter().enumerate() {
            index.insert(pos as u32, &fold_key(&city.name));
        }

        Snapshot { cities, index }
    }
}

type LoadResult = Result<Arc<Snapshot>>;

/// What a caller found when joining an in-flight load.
enum Role {
    /// First caller in: runs the fetch and publishes the outcome.
    Leader(watch::Sender<Option<LoadResult>>),
    /// Everyone else: waits for the leader's published outcome.
    Waiter(watch::Receiver<Option<LoadResult>>),
}

/// Aggregate counts for diagnostics and the CLI.
#[derive(Debug, Clone, Copy)]
pub struct CatalogStats {
    pub cities: usize,
    pub loaded: bool,
}

/// Owns the authoritative city list and serves prefix queries over it.
pub struct CityCatalog<P> {
    provider: P,
    cache: RwLock<Option<Arc<Snapshot>>>,
    /// Receiver for the load currently in flight, if any. Guarded by an async
    /// mutex so leader election itself never blocks a thread.
    inflight: AsyncMutex<Option<watch::Receiver<Option<LoadResult>>>>,
}

impl<P: RecordProvider> CityCatalog<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
            inflight: AsyncMutex::new(None),
        }
    }

    /// The full catalog in display order, fetching it on first use.
    ///
    /// Concurrent callers before the first successful load coalesce onto a
    /// single provider fetch and all receive its result — or its failure,
    /// which is not cached: the next call starts a fresh attempt.
    pub async fn get_all_cities(&self) -> Result<Vec<City>> {
        loop {
            if let Some(snapshot) = self.snapshot() {
                return Ok(snapshot.cities.clone());
            }

            let role = {
                let mut slot = self.inflight.lock().await;
                // A load may have finished while we waited for the slot.
                if let Some(snapshot) = self.snapshot() {
                    return Ok(snapshot.cities.clone());
                }
                match slot.as_ref() {
                    // Only join a load whose leader is still alive. A
                    // receiver whose sender is gone is a leftover from an
                    // abandoned load (the leader's future was dropped before
                    // it could clear the slot); reclaim it.
                    Some(rx) if rx.has_changed().is_ok() => Role::Waiter(rx.clone()),
                    _ => {
                        let (tx, rx) = watch::channel(None);
                        *slot = Some(rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let result = self.load_snapshot().await;
                    if let Ok(snapshot) = &result {
                        *self.cache_mut() = Some(Arc::clone(snapshot));
                    }
                    self.inflight.lock().await.take();
                    let _ = tx.send(Some(result.clone()));
                    return result.map(|s| s.cities.clone());
                }
                Role::Waiter(mut rx) => {
                    loop {
                        if let Some(result) = rx.borrow_and_update().clone() {
                            return result.map(|s| s.cities.clone());
                        }
                        if rx.changed().await.is_err() {
                            // The leader was dropped before publishing;
                            // go around and elect a new one.
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Prefix query against the cached snapshot.
    ///
    /// Empty catalog → empty result (searching never fetches). Empty prefix →
    /// the whole snapshot. Otherwise the folded prefix is answered by the
    /// trie: exact case-folded prefix match, diacritics significant.
    pub fn search_cities(&self, prefix: &str) -> Vec<City> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        if prefix.is_empty() {
            return snapshot.cities.clone();
        }

        let key = fold_key(prefix);
        snapshot
            .index
            .search(&key)
            .iter()
            .map(|&pos| snapshot.cities[pos as usize].clone())
            .collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn stats(&self) -> CatalogStats {
        match self.snapshot() {
            Some(snapshot) => CatalogStats {
                cities: snapshot.cities.len(),
                loaded: true,
            },
            None => CatalogStats {
                cities: 0,
                loaded: false,
            },
        }
    }

    async fn load_snapshot(&self) -> LoadResult {
        let records = self.provider.fetch_records().await?;
        let snapshot = Snapshot::build(records);
        log::info!("city catalog loaded: {} cities", snapshot.cities.len());
        Ok(Arc::new(snapshot))
    }

    fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn cache_mut(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<Snapshot>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::CoordinateRecord;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockProvider {
        records: Vec<CityRecord>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        failures: AtomicUsize,
    }

    impl MockProvider {
        fn new(records: Vec<CityRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
                delay: None,
                failures: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn failing_first(self, failures: usize) -> Self {
            self.failures.store(failures, Ordering::SeqCst);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordProvider for MockProvider {
        async fn fetch_records(&self) -> Result<Vec<CityRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(FetchError::Status(500));
            }
            Ok(self.records.clone())
        }
    }

    fn record(id: i64, name: &str, country: &str, lat: f64, lon: f64) -> CityRecord {
        CityRecord {
            id,
            name: name.to_string(),
            country: country.to_string(),
            coord: CoordinateRecord { lat, lon },
        }
    }

    fn five_cities() -> Vec<CityRecord> {
        vec![
            record(1, "New York", "US", 40.7128, -74.0060),
            record(2, "Tokyo", "JP", 35.6762, 139.6503),
            record(3, "Paris", "FR", 48.8566, 2.3522),
            record(4, "New Delhi", "IN", 28.6139, 77.2090),
            record(5, "São Paulo", "BR", -23.5505, -46.6333),
        ]
    }

    fn names(cities: &[City]) -> Vec<&str> {
        cities.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn load_sorts_case_insensitively() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        let cities = catalog.get_all_cities().await.unwrap();
        assert_eq!(
            names(&cities),
            ["New Delhi", "New York", "Paris", "São Paulo", "Tokyo"]
        );
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        catalog.get_all_cities().await.unwrap();
        catalog.get_all_cities().await.unwrap();
        assert_eq!(catalog.provider.calls(), 1);
    }

    #[tokio::test]
    async fn search_before_load_is_empty_and_does_not_fetch() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        assert!(catalog.search_cities("new").is_empty());
        assert!(catalog.search_cities("").is_empty());
        assert_eq!(catalog.provider.calls(), 0);
        assert!(!catalog.is_loaded());
    }

    #[tokio::test]
    async fn search_scenarios_from_the_loaded_catalog() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        catalog.get_all_cities().await.unwrap();

        assert_eq!(names(&catalog.search_cities("new")), ["New Delhi", "New York"]);
        assert_eq!(names(&catalog.search_cities("pa")), ["Paris"]);
        assert_eq!(names(&catalog.search_cities("são")), ["São Paulo"]);
        assert!(catalog.search_cities("xyz").is_empty());
        assert_eq!(catalog.search_cities("").len(), 5);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        catalog.get_all_cities().await.unwrap();

        let lower = catalog.search_cities("new");
        let upper = catalog.search_cities("NEW");
        let mixed = catalog.search_cities("New");
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert_eq!(lower.len(), 2);
    }

    #[tokio::test]
    async fn folded_matching_keeps_diacritics_significant() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        catalog.get_all_cities().await.unwrap();

        assert_eq!(catalog.search_cities("SÃO").len(), 1);
        assert!(catalog.search_cities("sao").is_empty());
    }

    #[tokio::test]
    async fn symbol_initial_names_sort_last() {
        let mut records = five_cities();
        records.push(record(6, "'s-Hertogenbosch", "NL", 51.69, 5.30));
        records.push(record(7, "Århus", "DK", 56.16, 10.20));
        let catalog = CityCatalog::new(MockProvider::new(records));
        let cities = catalog.get_all_cities().await.unwrap();
        assert_eq!(cities.last().unwrap().name, "'s-Hertogenbosch");
        assert!(names(&cities)[..6].contains(&"Århus"));
    }

    #[tokio::test]
    async fn invalid_records_are_skipped_not_fatal() {
        let mut records = five_cities();
        records.push(record(8, "", "XX", 0.0, 0.0));
        records.push(record(9, "Out Of Range", "XX", 95.0, 0.0));
        let catalog = CityCatalog::new(MockProvider::new(records));
        let cities = catalog.get_all_cities().await.unwrap();
        assert_eq!(cities.len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_loads_coalesce_into_one_fetch() {
        let provider = MockProvider::new(five_cities()).with_delay(Duration::from_millis(50));
        let catalog = Arc::new(CityCatalog::new(provider));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move { catalog.get_all_cities().await })
            })
            .collect();

        for task in tasks {
            let cities = task.await.unwrap().unwrap();
            assert_eq!(cities.len(), 5);
        }
        assert_eq!(catalog.provider.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn coalesced_callers_share_the_same_failure() {
        let provider = MockProvider::new(five_cities())
            .with_delay(Duration::from_millis(50))
            .failing_first(1);
        let catalog = Arc::new(CityCatalog::new(provider));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move { catalog.get_all_cities().await })
            })
            .collect();

        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            assert!(matches!(err, FetchError::Status(500)));
        }
        // One shared attempt; nothing was cached.
        assert_eq!(catalog.provider.calls(), 1);
        assert!(!catalog.is_loaded());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn abandoned_load_does_not_wedge_later_callers() {
        let provider = MockProvider::new(five_cities()).with_delay(Duration::from_millis(200));
        let catalog = Arc::new(CityCatalog::new(provider));

        let leader = {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.get_all_cities().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let follower = {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.get_all_cities().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Abort the fetch mid-flight; the follower must start a fresh one
        // instead of waiting on the dead load forever.
        leader.abort();
        assert!(leader.await.unwrap_err().is_cancelled());

        let cities = tokio::time::timeout(Duration::from_secs(2), follower)
            .await
            .expect("follower should not hang after the load was aborted")
            .unwrap()
            .unwrap();
        assert_eq!(cities.len(), 5);
        assert!(catalog.is_loaded());
        assert_eq!(catalog.provider.calls(), 2);
    }

    #[tokio::test]
    async fn failure_is_not_cached_and_retry_succeeds() {
        let provider = MockProvider::new(five_cities()).failing_first(1);
        let catalog = CityCatalog::new(provider);

        assert!(catalog.get_all_cities().await.is_err());
        assert!(!catalog.is_loaded());

        let cities = catalog.get_all_cities().await.unwrap();
        assert_eq!(cities.len(), 5);
        assert_eq!(catalog.provider.calls(), 2);
    }

    #[tokio::test]
    async fn stats_reflect_the_snapshot() {
        let catalog = CityCatalog::new(MockProvider::new(five_cities()));
        assert!(!catalog.stats().loaded);
        catalog.get_all_cities().await.unwrap();
        let stats = catalog.stats();
        assert!(stats.loaded);
        assert_eq!(stats.cities, 5);
    }
}
