//! Upstream payloads: the raw BlockCypher JSON shapes and the normalized
//! payloads the lookup services consume.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Transaction, TxIo};

/// Full address data as reported upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressPayload {
    /// `None` when upstream omits the balance.
    pub balance: Option<i64>,
    pub txs: Vec<TxSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TxSummary {
    pub confirmed: bool,
}

impl AddressPayload {
    pub fn confirmed_count(&self) -> i64 {
        self.txs.iter().filter(|tx| tx.confirmed).count() as i64
    }
}

/// Transaction detail as reported upstream. `error` is set when the provider
/// answered with an explicit error body instead of a transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionPayload {
    pub fees: i64,
    pub confirmed: Option<DateTime<Utc>>,
    pub inputs: Vec<TxIo>,
    pub outputs: Vec<TxIo>,
    pub error: Option<String>,
}

impl TransactionPayload {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Build the cache record; `None` while the transaction is unconfirmed.
    pub fn into_transaction(self, hash: &str) -> Option<Transaction> {
        let confirmed = self.confirmed?;
        Some(Transaction {
            id: None,
            hash: hash.to_string(),
            fees: self.fees,
            confirmed,
            inputs: self.inputs,
            outputs: self.outputs,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAddressFull {
    pub balance: Option<i64>,
    #[serde(default)]
    pub txs: Vec<RawTxRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTxRef {
    // Absent or null while the transaction is unconfirmed.
    #[serde(default)]
    pub confirmed: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransaction {
    #[serde(default)]
    pub fees: i64,
    pub confirmed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inputs: Vec<TxIo>,
    #[serde(default)]
    pub outputs: Vec<TxIo>,
}

/// Extract the explicit `error` message from a BlockCypher body, if any.
pub(crate) fn extract_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn extract_address_payload(raw: RawAddressFull) -> AddressPayload {
    AddressPayload {
        balance: raw.balance,
        txs: raw
            .txs
            .into_iter()
            .map(|tx| TxSummary {
                confirmed: tx.confirmed.is_some_and(|v| !v.is_null()),
            })
            .collect(),
    }
}

pub(crate) fn extract_transaction_payload(raw: RawTransaction) -> TransactionPayload {
    TransactionPayload {
        fees: raw.fees,
        confirmed: raw.confirmed,
        inputs: raw.inputs,
        outputs: raw.outputs,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_only_confirmed_transactions() {
        let raw: RawAddressFull = serde_json::from_value(json!({
            "address": "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "balance": 500,
            "txs": [
                {"hash": "aa", "confirmed": "2014-08-03T15:52:11Z"},
                {"hash": "bb"},
                {"hash": "cc", "confirmed": null}
            ]
        }))
        .unwrap();

        let payload = extract_address_payload(raw);
        assert_eq!(payload.balance, Some(500));
        assert_eq!(payload.txs.len(), 3);
        assert_eq!(payload.confirmed_count(), 1);
    }

    #[test]
    fn missing_balance_and_txs_are_tolerated() {
        let raw: RawAddressFull = serde_json::from_value(json!({"address": "x"})).unwrap();
        let payload = extract_address_payload(raw);
        assert_eq!(payload.balance, None);
        assert_eq!(payload.confirmed_count(), 0);
    }

    #[test]
    fn transaction_payload_keeps_inputs_and_outputs() {
        let raw: RawTransaction = serde_json::from_value(json!({
            "hash": "f854aebae95150b379cc1187d848d58225f3c4157fe992bcd166f58bd5063449",
            "fees": 10000,
            "confirmed": "2014-08-03T15:52:11Z",
            "inputs": [{"prev_hash": "ab", "output_value": 5}],
            "outputs": [{"value": 4, "addresses": ["1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"]}]
        }))
        .unwrap();

        let payload = extract_transaction_payload(raw);
        assert_eq!(payload.fees, 10000);
        assert!(payload.confirmed.is_some());
        assert_eq!(payload.inputs[0]["output_value"], json!(5));

        let tx = payload.into_transaction("f854").unwrap();
        assert_eq!(tx.hash, "f854");
        assert_eq!(tx.outputs.len(), 1);
    }

    #[test]
    fn unconfirmed_transaction_has_no_record() {
        let payload = TransactionPayload {
            fees: 1,
            ..TransactionPayload::default()
        };
        assert!(payload.into_transaction("abc").is_none());
    }

    #[test]
    fn error_field_is_extracted() {
        assert_eq!(
            extract_error(&json!({"error": "Transaction abc not found."})),
            Some("Transaction abc not found.".to_string())
        );
        assert_eq!(extract_error(&json!({"error": null})), None);
        assert_eq!(extract_error(&json!({"fees": 1})), None);
    }
}
