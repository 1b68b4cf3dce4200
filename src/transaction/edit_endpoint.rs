//! Defines the endpoint for updating a transaction.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error, ValidationError,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{Transaction, TransactionSource, TransactionType, TransactionUpdate},
    user::UserID,
};

/// The JSON body for updating a transaction. Missing fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new type, "income" or "expense".
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// The new category.
    #[serde(default)]
    pub category: Option<String>,
    /// The new source, "manual" or "guest".
    #[serde(default)]
    pub source: Option<String>,
    /// The new timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    /// The new description, an empty string removes it.
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<UpdateTransactionRequest> for TransactionUpdate {
    type Error = ValidationError;

    fn try_from(request: UpdateTransactionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: request.amount,
            transaction_type: request
                .transaction_type
                .map(|transaction_type| transaction_type.parse::<TransactionType>())
                .transpose()?,
            category: request.category,
            source: request
                .source
                .map(|source| source.parse::<TransactionSource>())
                .transpose()?,
            timestamp: request.timestamp,
            description: request.description,
        })
    }
}

/// A route handler for updating a transaction, responds with the updated transaction.
///
/// Responds with 404 if the transaction does not exist or belongs to another user.
pub async fn update_transaction_endpoint<T>(
    State(state): State<AppState<T>>,
    Path((user_id, transaction_id)): Path<(UserID, TransactionId)>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let update = TransactionUpdate::try_from(request)?;

    state
        .transaction_store
        .update(transaction_id, user_id, update)
        .inspect_err(|error| {
            tracing::warn!("Could not update transaction {transaction_id}: {error}")
        })
        .map(Json)
}

#[cfg(test)]
mod update_transaction_tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        endpoints::{self, format_endpoint, format_user_endpoint},
        stores::TransactionStore,
        test_utils::{assert_json_error, get_test_server},
        transaction::{Transaction, TransactionType},
        user::UserID,
    };

    const OWNER: UserID = UserID::new(1);

    fn transaction_endpoint(user_id: UserID, transaction: &Transaction) -> String {
        format_endpoint(
            &format_user_endpoint(endpoints::USER_TRANSACTION, user_id),
            transaction.id,
        )
    }

    #[tokio::test]
    async fn updates_transaction() {
        let (server, store) = get_test_server();
        let transaction = store
            .create(
                Transaction::build(OWNER, 100.0, TransactionType::Expense, "food")
                    .description("Lunch"),
            )
            .unwrap();

        let response = server
            .put(&transaction_endpoint(OWNER, &transaction))
            .json(&json!({
                "amount": 80.0,
                "type": "income",
                "timestamp": "2025-10-01T00:00:00Z",
                "description": "",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(updated.amount, 80.0);
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.category, transaction.category);
        assert_eq!(updated.timestamp, datetime!(2025-10-01 00:00 UTC));
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, transaction.created_at);
        assert_eq!(store.get(transaction.id, OWNER), Ok(updated));
    }

    #[tokio::test]
    async fn update_of_other_users_transaction_is_not_found() {
        let (server, store) = get_test_server();
        let transaction = store
            .create(Transaction::build(
                OWNER,
                100.0,
                TransactionType::Expense,
                "food",
            ))
            .unwrap();

        let response = server
            .put(&transaction_endpoint(UserID::new(2), &transaction))
            .json(&json!({ "amount": 1.0 }))
            .await;

        assert_json_error(&response, StatusCode::NOT_FOUND);
        assert_eq!(store.get(transaction.id, OWNER), Ok(transaction));
    }

    #[tokio::test]
    async fn update_with_invalid_values_is_bad_request() {
        let (server, store) = get_test_server();
        let transaction = store
            .create(Transaction::build(
                OWNER,
                100.0,
                TransactionType::Expense,
                "food",
            ))
            .unwrap();
        let endpoint = transaction_endpoint(OWNER, &transaction);

        for body in [
            json!({ "amount": -1.0 }),
            json!({ "category": "" }),
            json!({ "type": "refund" }),
            json!({ "source": "robot" }),
        ] {
            let response = server.put(&endpoint).json(&body).await;

            assert_json_error(&response, StatusCode::BAD_REQUEST);
        }

        assert_eq!(store.get(transaction.id, OWNER), Ok(transaction));
    }
}
