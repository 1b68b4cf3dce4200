//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error, ValidationError,
    stores::TransactionStore,
    transaction::{Transaction, TransactionBuilder},
    user::UserID,
};

/// The JSON body for creating a transaction.
///
/// `type` and `source` are kept as strings so that unknown values are reported
/// as validation errors rather than as malformed JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The category label.
    pub category: String,
    /// Either "manual" or "guest", defaults to "manual".
    #[serde(default)]
    pub source: Option<String>,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateTransactionRequest {
    fn into_builder(self, user_id: UserID) -> Result<TransactionBuilder, ValidationError> {
        let mut builder = Transaction::build(
            user_id,
            self.amount,
            self.transaction_type.parse()?,
            &self.category,
        );

        if let Some(source) = self.source {
            builder = builder.source(source.parse()?);
        }

        builder.timestamp = self.timestamp;
        builder.description = self.description;

        Ok(builder)
    }
}

/// A route handler for creating a new transaction, responds with the created transaction.
pub async fn create_transaction_endpoint<T>(
    State(state): State<AppState<T>>,
    Path(user_id): Path<UserID>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let builder = request.into_builder(user_id)?;

    let transaction = state.transaction_store.create(builder).inspect_err(|error| {
        tracing::warn!("Could not create transaction for user {user_id}: {error}")
    })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
