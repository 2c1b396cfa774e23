//! In-memory cache implementation.
//!
//! [`MemoryCache`] keeps every entry in a process-wide table guarded by a
//! [`RwLock`]. Entries are populated on demand and never evicted, which
//! matches the lifetime of a single build or server run.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Cache, CacheBucket};

type Store = Arc<RwLock<HashMap<(String, String), Vec<u8>>>>;

/// In-memory [`Cache`] shared by all buckets it hands out.
///
/// Cloning a `MemoryCache` yields a handle onto the same table.
#[derive(Clone, Default)]
pub struct MemoryCache {
    store: Store,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            store: Arc::clone(&self.store),
        })
    }
}

/// A single named partition of a [`MemoryCache`].
struct MemoryCacheBucket {
    name: String,
    store: Store,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        // A poisoned lock still holds consistent data: writers only insert.
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.get(&(self.name.clone(), key.to_owned())).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        tracing::trace!(bucket = %self.name, key, "cache insert");
        store.insert((self.name.clone(), key.to_owned()), value.to_vec());
    }
}
