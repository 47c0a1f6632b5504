// SQLite connection pool bootstrap: create the database file if needed,
// enable WAL and run migrations. Attempts are retried with exponential backoff.

use backon::{ExponentialBuilder, Retryable};
use sqlx::{migrate::MigrateDatabase, Pool, Sqlite, SqlitePool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::migration::run_migrations;

pub async fn establish_connection(config: &Config) -> Result<Pool<Sqlite>, sqlx::Error> {
    let database_url = config.database_url.as_str();

    (|| connect(database_url))
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(200))
                .with_max_times(config.db_connect_retries),
        )
        .notify(|err: &sqlx::Error, delay: Duration| {
            warn!("Database connection failed ({}), retrying in {:?}", err, delay);
        })
        .await
}

async fn connect(database_url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    info!("Start database connection - {}", database_url);

    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePool::connect(database_url).await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

    run_migrations(&pool).await?;

    info!("Connection with database successfully established");
    Ok(pool)
}
