pub mod address;
pub mod error;
pub mod transaction;

pub use address::{AddressLookupService, ADDRESS_ROUTE};
pub use error::LookupError;
pub use transaction::{TransactionLookupService, TRANSACTION_ROUTE};
