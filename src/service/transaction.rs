use std::sync::Arc;

use tracing::{error, info};

use crate::blockchain::UpstreamClient;
use crate::db::CacheStore;
use crate::models::Transaction;
use crate::rate_limit::RateLimiter;
use crate::service::error::LookupError;
use crate::validation::validate_transaction_hash;

/// Rate-limit key shared by every transaction lookup.
pub const TRANSACTION_ROUTE: &str = "/transaction";

/// Cache-first lookup of transaction details. Stored transactions are
/// served forever; upstream is consulted at most once per hash.
#[derive(Clone)]
pub struct TransactionLookupService {
    store: Arc<dyn CacheStore>,
    limiter: RateLimiter,
    upstream: Arc<dyn UpstreamClient>,
}

impl TransactionLookupService {
    pub fn new(
        store: Arc<dyn CacheStore>,
        limiter: RateLimiter,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            store,
            limiter,
            upstream,
        }
    }

    pub async fn lookup(&self, raw_hash: &str) -> Result<Transaction, LookupError> {
        if let Err(e) = validate_transaction_hash(raw_hash) {
            error!("hash {:?} is invalid - needs to be 64 chars", raw_hash);
            return Err(e.into());
        }

        if let Some(transaction) = self.store.find_transaction(raw_hash).await? {
            info!("Cache hits - fetching transaction from db");
            return Ok(transaction);
        }

        if self.limiter.is_limited(TRANSACTION_ROUTE).await? {
            return Err(LookupError::RateLimited);
        }

        info!("Cache miss - calling api to fetch data");

        let mut payload = self.upstream.fetch_transaction(raw_hash).await.map_err(|e| {
            error!("failed to fetch transaction {:?} from api ({})", raw_hash, e);
            LookupError::UpstreamUnavailable(e.to_string())
        })?;

        if let Some(message) = payload.error.take() {
            return Err(LookupError::UpstreamRejected(message));
        }

        // Only confirmed transactions are cached, stored records never change.
        let transaction = payload.into_transaction(raw_hash).ok_or_else(|| {
            LookupError::UpstreamRejected(format!("transaction {} is not confirmed yet", raw_hash))
        })?;

        info!("Inserting new transaction record {:?}", raw_hash);
        Ok(self.store.insert_transaction(transaction).await?)
    }
}
