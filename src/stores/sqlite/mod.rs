//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

pub mod transaction;

pub use transaction::SQLiteTransactionStore;

use crate::{AppState, Error};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteTransactionStore>;

/// Creates an [AppState] instance backed by a new in-memory SQLite database.
///
/// Intended for tests and tooling, the data is lost when the state is dropped.
pub fn create_in_memory_app_state() -> Result<SQLAppState, Error> {
    Ok(AppState::new(SQLiteTransactionStore::open_in_memory()?))
}
