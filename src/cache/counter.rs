//! In-process fixed-window counter store using Moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::rate_limit::{CounterError, CounterStore};

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u64,
    started: Instant,
}

/// Counts operations per key inside a fixed window.
///
/// Increments are atomic per key (Moka serializes upserts on the same key).
/// The window start is kept in the entry itself; the cache TTL only evicts
/// keys that have been idle for a whole window.
#[derive(Clone)]
pub struct MokaCounterStore {
    cache: Cache<String, WindowCounter>,
    window: Duration,
}

impl MokaCounterStore {
    pub fn new(capacity: u64, window: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(window)
            .build();

        Self { cache, window }
    }

    #[cfg(test)]
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[async_trait]
impl CounterStore for MokaCounterStore {
    async fn increment(&self, key: &str) -> Result<u64, CounterError> {
        let window = self.window;
        let entry = self
            .cache
            .entry_by_ref(key)
            .and_upsert_with(|existing| {
                let now = Instant::now();
                let next = match existing.map(|entry| entry.into_value()) {
                    Some(counter) if now.duration_since(counter.started) < window => WindowCounter {
                        count: counter.count + 1,
                        started: counter.started,
                    },
                    _ => WindowCounter { count: 1, started: now },
                };
                std::future::ready(next)
            })
            .await;

        let counter = entry.into_value();
        if counter.count == 1 {
            debug!("Started new {:?} window for key: {}", window, key);
        }
        Ok(counter.count)
    }
}
