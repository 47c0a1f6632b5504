pub mod api;
pub mod blockchain;
pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod rate_limit;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use models::{Address, Transaction};
pub use service::{AddressLookupService, LookupError, TransactionLookupService};
pub use validation::{validate_bitcoin_address, validate_transaction_hash};
