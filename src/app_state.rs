//! Implements a struct that holds the state of the REST server.

use std::path::Path;

use crate::{Error, stores::SQLiteTransactionStore};

/// The state of the REST server.
///
/// `T` is the store used by the route handlers, which lets tests swap in
/// a store backed by an in-memory database.
#[derive(Debug, Clone)]
pub struct AppState<T> {
    /// The store for managing user transactions.
    pub transaction_store: T,
}

impl<T> AppState<T> {
    /// Create a new [AppState] from a transaction store.
    pub fn new(transaction_store: T) -> Self {
        Self { transaction_store }
    }
}

impl AppState<SQLiteTransactionStore> {
    /// Create a new [AppState] backed by the SQLite database file at `db_path`.
    ///
    /// The file is created if it does not exist, and the tables and indexes are
    /// added if they are missing.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, Error> {
        SQLiteTransactionStore::open(db_path).map(Self::new)
    }
}
