//! Bounded in-memory cache of decoded domain objects.

use crate::traits::Cacher;
use quick_cache::sync::Cache;
use std::sync::Arc;

/// Bounded cache keyed by object hash bytes.
///
/// Writers elsewhere in the node insert decoded objects as they are
/// observed; resolvers only peek. `peek` does not promote the entry, so a
/// resolver answering requests cannot keep otherwise-cold entries alive.
pub struct DataCache<T> {
    inner: Cache<Vec<u8>, Arc<T>>,
}

impl<T> DataCache<T> {
    /// Create a cache holding up to `capacity` objects.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    /// Insert or replace an entry. Called by the pool writer, not resolvers.
    pub fn insert(&self, key: Vec<u8>, value: Arc<T>) {
        self.inner.insert(key, value);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: Send + Sync + 'static> Cacher<T> for DataCache<T> {
    fn peek(&self, key: &[u8]) -> Option<Arc<T>> {
        self.inner.peek(key)
    }
}
