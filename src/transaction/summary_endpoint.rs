//! Defines the endpoint for the totals of a user's transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    stores::TransactionStore,
    transaction::{TimestampRange, TransactionSummary},
    user::UserID,
};

/// The optional RFC 3339 bounds of the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryParams {
    /// The earliest timestamp to include.
    pub from: Option<String>,
    /// The latest timestamp to include.
    pub to: Option<String>,
}

/// A route handler for summarizing a user's income and expenses.
pub async fn get_summary_endpoint<T>(
    State(state): State<AppState<T>>,
    Path(user_id): Path<UserID>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<TransactionSummary>, Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let range = TimestampRange::parse(params.from.as_deref(), params.to.as_deref())?;

    state
        .transaction_store
        .summarize(user_id, range)
        .map(Json)
}
