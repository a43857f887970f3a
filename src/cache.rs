//! Per-key memoized async results with single-flight semantics.
//!
//! Concurrent lookups for the same key share one producer run; later lookups
//! within the retention window get the stored value without running it
//! again. Expired entries are replaced on the next lookup.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use tracing::trace;

struct Slot<V> {
    cell: Arc<OnceCell<V>>,
    created: Instant,
}

/// Memoizing cache keyed by string, typically an article URL.
pub struct DetailCache<V> {
    slots: Mutex<HashMap<String, Slot<V>>>,
    ttl: Duration,
}

impl<V: Clone> DetailCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the value for `key`, running `producer` only if no live entry
    /// exists and no other caller is already producing it.
    pub async fn try_get<F, Fut>(&self, key: &str, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let live = slots
                .get(key)
                .filter(|slot| now.duration_since(slot.created) < self.ttl)
                .map(|slot| Arc::clone(&slot.cell));

            match live {
                Some(cell) => {
                    trace!(key, "Cache slot reused");
                    cell
                }
                None => {
                    let cell = Arc::new(OnceCell::new());
                    slots.insert(
                        key.to_string(),
                        Slot {
                            cell: Arc::clone(&cell),
                            created: now,
                        },
                    );
                    cell
                }
            }
        };

        cell.get_or_init(producer).await.clone()
    }

    /// Store `value` under `key` as if it had just been produced.
    #[cfg(test)]
    pub async fn insert(&self, key: &str, value: V) {
        let cell = Arc::new(OnceCell::new_with(Some(value)));
        self.slots.lock().await.insert(
            key.to_string(),
            Slot {
                cell,
                created: Instant::now(),
            },
        );
    }

    /// Number of slots, including ones that have expired but not been replaced.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}
