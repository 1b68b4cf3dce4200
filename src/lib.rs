//! Fintrack is a backend for tracking personal income and expenses.
//!
//! This library provides a JSON REST API over a store of per-user financial
//! transactions. The store keeps secondary indexes so that a user's
//! transactions can be listed by time, by type, or by category without
//! scanning every user's data.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod database_id;
mod db;
pub mod endpoints;
mod logging;
mod not_found;
mod routing;
pub mod stores;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{SQLiteTransactionStore, TransactionStore};
pub use transaction::{
    CategoryName, CategoryTotal, CreateTransactionRequest, ListTransactionsParams, SortOrder,
    SummaryParams, TimestampRange, Transaction, TransactionBuilder, TransactionQuery,
    TransactionSource, TransactionSummary, TransactionType, TransactionUpdate,
    UpdateTransactionRequest,
};
pub use user::UserID;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install the Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A field of a transaction had a value that may not be persisted.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Transaction amounts are magnitudes, the direction of the money is
    /// given by the transaction type.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The amount was NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// The category was an empty string after trimming whitespace.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// The transaction type was not one of "income" or "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The transaction source was not one of "manual" or "guest".
    #[error("\"{0}\" is not a valid transaction source, expected \"manual\" or \"guest\"")]
    InvalidSource(String),

    /// The timestamp cannot be represented in the database.
    #[error("timestamp {0} is outside the supported range")]
    TimestampOutOfRange(String),

    /// A timestamp query parameter was not an RFC 3339 date and time.
    #[error("\"{0}\" is not a valid RFC 3339 timestamp")]
    InvalidTimestamp(String),

    /// The sort order was not one of "asc" or "desc".
    #[error("\"{0}\" is not a valid sort order, expected \"asc\" or \"desc\"")]
    InvalidSortOrder(String),
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client provided a value that failed validation.
    ///
    /// The message is safe to show to the client.
    #[error("invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or belongs to
    /// another user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The database connection is still shared with other owners, so it
    /// cannot be closed yet.
    #[error("the database connection is still in use")]
    DatabaseInUse,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Whether the error means that no matching record owned by the user
    /// exists.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound | Error::UpdateMissingTransaction | Error::DeleteMissingTransaction
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A description of what went wrong.
    pub error: String,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(_) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(self.to_string()))).into_response()
            }
            error if error.is_not_found() => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::new(error.to_string()))).into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(
                        "An unexpected error occurred, check the server logs for more details.",
                    )),
                )
                    .into_response()
            }
        }
    }
}
