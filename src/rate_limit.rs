//! Fixed-window rate limiting of upstream calls.
//!
//! The limiter is a shared budget per key: services key it by operation, not
//! by caller, so every client of an endpoint draws from the same window.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::keys::RateLimitKey;
use crate::config::Config;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}

/// Atomic counter with a fixed expiry window per key.
///
/// The first increment of a key starts its window; once the window has
/// elapsed the next increment starts a new one and returns 1.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, key: &str) -> Result<u64, CounterError>;
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    max_requests: u64,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, max_requests: u64) -> Self {
        Self { store, max_requests }
    }

    pub fn from_config(store: Arc<dyn CounterStore>, config: &Config) -> Self {
        Self::new(store, config.rate_limit_max_requests)
    }

    #[cfg(test)]
    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Count one more operation under `key` and return the count in the
    /// current window.
    pub async fn increment(&self, key: &str) -> Result<u64, CounterError> {
        let key = RateLimitKey::route(key);
        let count = self.store.increment(&key.to_string()).await?;
        info!("Rate limiter {} increased by 1 to total {}", key, count);
        Ok(count)
    }

    /// Increments `key` and reports whether the threshold is now exceeded.
    pub async fn is_limited(&self, key: &str) -> Result<bool, CounterError> {
        let count = self.increment(key).await?;
        let limited = count > self.max_requests;
        if limited {
            warn!(
                "Rate limit hit for {}: {} requests (max {})",
                key, count, self.max_requests
            );
        }
        Ok(limited)
    }
}
