//! The bundled SQLite backend.

pub mod db;
mod sqlite_impl;

pub use db::{db_url, new_pool, SqliteDatabaseError};
pub use sqlite_impl::SqliteDatabase;
