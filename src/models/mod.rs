// Address and Transaction records as persisted in the cache store and
// returned over the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque key/value record describing one transaction input or output.
pub type TxIo = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub address: String,
    pub balance: i64,
    pub transaction_count: i64,
    pub timestamp: DateTime<Utc>,
}

impl Address {
    /// Balance stored when upstream omits it.
    pub const UNKNOWN_BALANCE: i64 = -1;

    pub fn new(address: impl Into<String>, balance: i64, transaction_count: i64) -> Self {
        Self {
            id: None,
            address: address.into(),
            balance,
            transaction_count,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub hash: String,
    pub fees: i64,
    pub confirmed: DateTime<Utc>,
    #[serde(default)]
    pub inputs: Vec<TxIo>,
    #[serde(default)]
    pub outputs: Vec<TxIo>,
    pub timestamp: DateTime<Utc>,
}
