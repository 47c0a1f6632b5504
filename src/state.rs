use std::sync::Arc;

use crate::blockchain::UpstreamClient;
use crate::config::Config;
use crate::db::CacheStore;
use crate::rate_limit::RateLimiter;
use crate::service::{AddressLookupService, TransactionLookupService};

pub struct AppState {
    pub config: Config,
    pub addresses: AddressLookupService,
    pub transactions: TransactionLookupService,
}

impl AppState {
    /// Both services share the store, the limiter's counter store and the
    /// upstream client.
    pub fn new(
        config: Config,
        store: Arc<dyn CacheStore>,
        limiter: RateLimiter,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            config,
            addresses: AddressLookupService::new(store.clone(), limiter.clone(), upstream.clone()),
            transactions: TransactionLookupService::new(store, limiter, upstream),
        }
    }
}
