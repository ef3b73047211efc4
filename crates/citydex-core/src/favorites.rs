// crates/citydex-core/src/favorites.rs

//! The favorited-city set: persisted on every mutation, observable by
//! subscribers.
//!
//! Persistence is best-effort by design: a failed write is logged and the
//! in-memory set stays authoritative for the rest of the process. The blob
//! encoding is a bincode sorted id list, so a fresh store over the same
//! blob always reproduces the same membership.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::model::City;
use crate::storage::BlobStore;

/// Storage key for the favorites blob.
pub const FAVORITES_KEY: &str = "citydex.favorites";

struct Subscriber {
    token: u64,
    callback: Box<dyn Fn() + Send + Sync>,
}

type Registry = Mutex<Vec<Arc<Subscriber>>>;

/// Persistent, observable set of favorited city ids.
pub struct FavoritesStore {
    storage: Arc<dyn BlobStore>,
    key: String,
    /// Guards the whole read-modify-persist sequence of a toggle, so two
    /// toggles of the same id can never interleave.
    set: Mutex<HashSet<i64>>,
    subscribers: Arc<Registry>,
    next_token: AtomicU64,
}

impl FavoritesStore {
    /// Store under the default [`FAVORITES_KEY`], loading persisted membership.
    pub fn new(storage: Arc<dyn BlobStore>) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let set = Self::load(storage.as_ref(), &key);
        Self {
            storage,
            key,
            set: Mutex::new(set),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_token: AtomicU64::new(0),
        }
    }

    /// O(1) membership check.
    pub fn is_favorite(&self, city_id: i64) -> bool {
        self.lock_set().contains(&city_id)
    }

    /// Flip membership of `city_id` and return the new state (`true` = now a
    /// favorite).
    ///
    /// The set is persisted before this returns and subscribers are notified
    /// after both the write and the in-memory update, so an observer that
    /// re-reads [`is_favorite`](Self::is_favorite) on notification always
    /// sees the post-toggle state. Two consecutive toggles restore the
    /// original membership.
    pub fn toggle_favorite(&self, city_id: i64) -> bool {
        let now_favorite;
        {
            let mut set = self.lock_set();
            now_favorite = if set.remove(&city_id) {
                false
            } else {
                set.insert(city_id);
                true
            };
            self.persist(&set);
        }
        self.notify();
        now_favorite
    }

    /// Current membership as a sorted id list.
    pub fn favorites(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.lock_set().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The cities from `cities` that are currently favorites, in input order.
    pub fn filter_favorites(&self, cities: &[City]) -> Vec<City> {
        let set = self.lock_set();
        cities
            .iter()
            .filter(|city| set.contains(&city.id))
            .cloned()
            .collect()
    }

    /// Register `callback` to run after every successful toggle.
    ///
    /// The returned handle unsubscribes when dropped (or via
    /// [`Subscription::unsubscribe`]).
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let subscriber = Arc::new(Subscriber {
            token,
            callback: Box::new(callback),
        });
        self.lock_subscribers().push(subscriber);
        Subscription {
            registry: Arc::downgrade(&self.subscribers),
            token,
        }
    }

    fn notify(&self) {
        // Snapshot the registry first: callbacks are free to re-enter reads
        // (or even subscribe) without holding any store lock.
        let subscribers: Vec<Arc<Subscriber>> = self.lock_subscribers().clone();
        for subscriber in subscribers {
            (subscriber.callback)();
        }
    }

    fn persist(&self, set: &HashSet<i64>) {
        let mut ids: Vec<i64> = set.iter().copied().collect();
        ids.sort_unstable();
        let bytes = match bincode::serialize(&ids) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("could not encode favorites: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(&self.key, &bytes) {
            log::warn!("could not persist favorites: {e}");
        }
    }

    fn load(storage: &dyn BlobStore, key: &str) -> HashSet<i64> {
        let bytes = match storage.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return HashSet::new(),
            Err(e) => {
                log::warn!("could not read favorites: {e}");
                return HashSet::new();
            }
        };
        match bincode::deserialize::<Vec<i64>>(&bytes) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                log::warn!("corrupt favorites blob, starting empty: {e}");
                HashSet::new()
            }
        }
    }

    fn lock_set(&self) -> std::sync::MutexGuard<'_, HashSet<i64>> {
        self.set.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Subscriber>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Unsubscribe handle returned by [`FavoritesStore::subscribe`].
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Registry>,
    token: u64,
}

impl Subscription {
    /// Explicit form of dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|s| s.token != self.token);
        }
    }
}
