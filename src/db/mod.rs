pub mod address;
pub mod connection;
pub mod migration;
pub mod store;
pub mod transaction;

pub use store::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Address, Transaction};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Persistent cache of address and transaction records.
///
/// Records are keyed by their natural id (address string, transaction hash).
/// Inserts are idempotent on that key: inserting a record whose key already
/// exists returns the stored record instead of failing.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn find_address(&self, address: &str) -> Result<Option<Address>, StoreError>;

    /// Persist a new address record and return it as stored.
    async fn insert_address(&self, address: Address) -> Result<Address, StoreError>;

    /// Overwrite balance and confirmed count of an existing record.
    ///
    /// Only applied when `transaction_count` is strictly greater than the
    /// stored value; returns whether a row was changed.
    async fn update_address_fields(
        &self,
        id: i64,
        balance: i64,
        transaction_count: i64,
    ) -> Result<bool, StoreError>;

    async fn get_address_by_id(&self, id: i64) -> Result<Address, StoreError>;

    async fn find_transaction(&self, hash: &str) -> Result<Option<Transaction>, StoreError>;

    /// Persist a new transaction and return it as stored.
    async fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction, StoreError>;
}
