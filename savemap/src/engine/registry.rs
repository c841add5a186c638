//! Memoized one-time initialization keyed by game kind.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

/// Runs an async initializer at most once per key.
///
/// Concurrent callers for the same key wait on the same initialization. A
/// failed initialization is not memoized; the next caller retries.
#[derive(Debug)]
pub struct InitGate<K: Eq + Hash> {
    cells: DashMap<K, Arc<OnceCell<()>>>,
}

impl<K: Eq + Hash> InitGate<K> {
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    /// Initialize `key` with `init` unless that already succeeded.
    pub async fn ensure<F, Fut, E>(&self, key: K, init: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        // Clone the cell out so the map shard is not locked across the await.
        let cell = Arc::clone(&self.cells.entry(key).or_default());
        cell.get_or_try_init(init).await.map(|_| ())
    }

    /// Whether `key` has been initialized successfully.
    pub fn is_ready(&self, key: &K) -> bool {
        self.cells
            .get(key)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }
}

impl<K: Eq + Hash> Default for InitGate<K> {
    fn default() -> Self {
        Self::new()
    }
}
