use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::db::StoreError;
use crate::models::{Transaction, TxIo};

const SELECT_TRANSACTION: &str =
    "SELECT id, hash, fees, confirmed, inputs, outputs, timestamp FROM transactions";

pub async fn find_transaction(
    pool: &Pool<Sqlite>,
    hash: &str,
) -> Result<Option<Transaction>, StoreError> {
    let row = sqlx::query(&format!("{SELECT_TRANSACTION} WHERE hash = ?"))
        .bind(hash)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(transaction_from_row).transpose()
}

/// Insert a transaction; a duplicate hash is a no-op and the stored row is
/// returned.
pub async fn add_transaction(
    pool: &Pool<Sqlite>,
    transaction: &Transaction,
) -> Result<Transaction, StoreError> {
    // Store these values to extend their lifetime
    let inputs = serde_json::to_string(&transaction.inputs)?;
    let outputs = serde_json::to_string(&transaction.outputs)?;

    sqlx::query(
        r#"
        INSERT INTO transactions (hash, fees, confirmed, inputs, outputs, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(hash) DO NOTHING
        "#,
    )
    .bind(&transaction.hash)
    .bind(transaction.fees)
    .bind(transaction.confirmed)
    .bind(inputs)
    .bind(outputs)
    .bind(transaction.timestamp)
    .execute(pool)
    .await?;

    let row = sqlx::query(&format!("{SELECT_TRANSACTION} WHERE hash = ?"))
        .bind(&transaction.hash)
        .fetch_one(pool)
        .await?;

    transaction_from_row(&row)
}

#[cfg(test)]
pub async fn count_transactions(pool: &Pool<Sqlite>) -> Result<i64, sqlx::Error> {
    let count = sqlx::query("SELECT COUNT(*) FROM transactions")
        .fetch_one(pool)
        .await?
        .try_get::<i64, _>(0)?;

    Ok(count)
}

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, StoreError> {
    let inputs: String = row.try_get("inputs")?;
    let outputs: String = row.try_get("outputs")?;

    Ok(Transaction {
        id: Some(row.try_get("id")?),
        hash: row.try_get("hash")?,
        fees: row.try_get("fees")?,
        confirmed: row.try_get("confirmed")?,
        inputs: serde_json::from_str::<Vec<TxIo>>(&inputs)?,
        outputs: serde_json::from_str::<Vec<TxIo>>(&outputs)?,
        timestamp: row.try_get("timestamp")?,
    })
}
