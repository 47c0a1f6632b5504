use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::blockchain::UpstreamClient;
use crate::db::{CacheStore, StoreError};
use crate::models::Address;
use crate::rate_limit::RateLimiter;
use crate::service::error::LookupError;
use crate::validation::validate_bitcoin_address;

/// Rate-limit key shared by every address lookup.
pub const ADDRESS_ROUTE: &str = "/address";

/// Cache-fallback lookup of address balance and confirmed transaction count.
#[derive(Clone)]
pub struct AddressLookupService {
    store: Arc<dyn CacheStore>,
    limiter: RateLimiter,
    upstream: Arc<dyn UpstreamClient>,
}

impl AddressLookupService {
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

    /// Look up `raw_address`, preferring live upstream data.
    ///
    /// Upstream failures fall back to the cached record when there is one.
    /// A cached record is only rewritten when upstream reports strictly more
    /// confirmed transactions than it holds.
    pub async fn lookup(&self, raw_address: &str) -> Result<Address, LookupError> {
        validate_bitcoin_address(raw_address)?;

        let cached = self.store.find_address(raw_address).await?;

        if self.limiter.is_limited(ADDRESS_ROUTE).await? {
            error!("rate limiter hits - request aborted");
            return Err(LookupError::RateLimited);
        }

        let payload = match self.upstream.fetch_address_full(raw_address).await {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to fetch data from api - rolling back to db ({})", e);
                return cached.ok_or_else(|| {
                    warn!("Record not found in db - address record {:?} not found", raw_address);
                    LookupError::NotFound(raw_address.to_string())
                });
            }
        };

        info!(
            "Found {} total transactions for address {:?}",
            payload.txs.len(),
            raw_address
        );

        let confirmed_count = payload.confirmed_count();
        let balance = payload.balance.unwrap_or(Address::UNKNOWN_BALANCE);

        match cached {
            Some(cached) => self.refresh(cached, balance, confirmed_count).await,
            None => {
                info!("Inserting new address record {:?}", raw_address);
                let record = Address::new(raw_address, balance, confirmed_count);
                Ok(self.store.insert_address(record).await?)
            }
        }
    }

    async fn refresh(
        &self,
        cached: Address,
        balance: i64,
        confirmed_count: i64,
    ) -> Result<Address, LookupError> {
        if confirmed_count <= cached.transaction_count {
            info!("Returning cached address record {:?}", cached.address);
            return Ok(cached);
        }

        let id = cached
            .id
            .ok_or_else(|| StoreError::NotFound(format!("id of address {}", cached.address)))?;

        info!(
            "Updating the address record {:?} with {} confirmed transactions",
            cached.address, confirmed_count
        );
        if !self.store.update_address_fields(id, balance, confirmed_count).await? {
            debug!(
                "Address {:?} already holds a count >= {}, keeping stored record",
                cached.address, confirmed_count
            );
        }

        Ok(self.store.get_address_by_id(id).await?)
    }
}
