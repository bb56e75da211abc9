//! SQLite-backed question-bank store.

mod connection;
mod store_impl;
mod transaction;


use rusqlite::Connection;

pub use transaction::Transaction;

/// Persistent question-bank store.
///
/// Owns the database connection; every mutating operation runs inside a
/// single transaction so cascades are atomic.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}
