use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::models::Address;

const SELECT_ADDRESS: &str =
    "SELECT id, address, balance, transaction_count, timestamp FROM addresses";

pub async fn find_address(pool: &Pool<Sqlite>, address: &str) -> Result<Option<Address>, sqlx::Error> {
    let row = sqlx::query(&format!("{SELECT_ADDRESS} WHERE address = ?"))
        .bind(address)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(address_from_row).transpose()
}

pub async fn get_address_by_id(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Address>, sqlx::Error> {
    let row = sqlx::query(&format!("{SELECT_ADDRESS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(address_from_row).transpose()
}

/// Insert a new address record. If the address is already stored (a
/// concurrent lookup won the race) the existing row is returned untouched.
pub async fn insert_address(pool: &Pool<Sqlite>, address: &Address) -> Result<Address, sqlx::Error> {
    sqlx::query(
        "INSERT INTO addresses (address, balance, transaction_count, timestamp)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(address) DO NOTHING",
    )
    .bind(&address.address)
    .bind(address.balance)
    .bind(address.transaction_count)
    .bind(address.timestamp)
    .execute(pool)
    .await?;

    let row = sqlx::query(&format!("{SELECT_ADDRESS} WHERE address = ?"))
        .bind(&address.address)
        .fetch_one(pool)
        .await?;

    address_from_row(&row)
}

/// Conditional refresh: the row only changes when the new confirmed count is
/// strictly greater than the stored one.
pub async fn update_address_fields(
    pool: &Pool<Sqlite>,
    id: i64,
    balance: i64,
    transaction_count: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE addresses
         SET balance = ?, transaction_count = ?, timestamp = ?
         WHERE id = ? AND transaction_count < ?",
    )
    .bind(balance)
    .bind(transaction_count)
    .bind(Utc::now())
    .bind(id)
    .bind(transaction_count)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn address_from_row(row: &SqliteRow) -> Result<Address, sqlx::Error> {
    Ok(Address {
        id: Some(row.try_get("id")?),
        address: row.try_get("address")?,
        balance: row.try_get("balance")?,
        transaction_count: row.try_get("transaction_count")?,
        timestamp: row.try_get("timestamp")?,
    })
}
