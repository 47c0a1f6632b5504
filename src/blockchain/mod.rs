pub mod client;
pub mod models;

// Re-exports for convenience
pub use client::{BlockCypherClient, UpstreamClient, UpstreamError};
pub use models::{AddressPayload, TransactionPayload, TxSummary};
