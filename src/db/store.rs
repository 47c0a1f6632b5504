use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{address, transaction, CacheStore, StoreError};
use crate::models::{Address, Transaction};

/// [`CacheStore`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn find_address(&self, key: &str) -> Result<Option<Address>, StoreError> {
        Ok(address::find_address(&self.pool, key).await?)
    }

    async fn insert_address(&self, record: Address) -> Result<Address, StoreError> {
        Ok(address::insert_address(&self.pool, &record).await?)
    }

    async fn update_address_fields(
        &self,
        id: i64,
        balance: i64,
        transaction_count: i64,
    ) -> Result<bool, StoreError> {
        Ok(address::update_address_fields(&self.pool, id, balance, transaction_count).await?)
    }

    async fn get_address_by_id(&self, id: i64) -> Result<Address, StoreError> {
        address::get_address_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("address id {id}")))
    }

    async fn find_transaction(&self, hash: &str) -> Result<Option<Transaction>, StoreError> {
        transaction::find_transaction(&self.pool, hash).await
    }

    async fn insert_transaction(&self, record: Transaction) -> Result<Transaction, StoreError> {
        transaction::add_transaction(&self.pool, &record).await
    }
}
