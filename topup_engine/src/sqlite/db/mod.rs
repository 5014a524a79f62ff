//! # SQLite database methods
//!
//! "Low-level" SQLite interactions live here, as plain functions taking a `&mut SqliteConnection`. Callers
//! obtain a connection from a pool, or open a transaction and pass `&mut *tx`, without any other changes.

use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;

use crate::db_types::OrderId;

pub mod orders;
pub mod pricing;

const SQLITE_DB_URL: &str = "sqlite://data/topup_store.db";

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Could not encode or decode stored JSON: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Order already exists: {0}")]
    OrderAlreadyExists(OrderId),
    #[error("Order was not found after insertion: {0}")]
    OrderInsertMissing(OrderId),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub fn db_url() -> String {
    let result = env::var("GTS_DATABASE_URL").unwrap_or_else(|_| {
        info!("GTS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
