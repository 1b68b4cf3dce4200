use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error, database_id::TransactionId, stores::TransactionStore, user::UserID,
};

/// A route handler for deleting a transaction, responds with 204 No Content.
///
/// Responds with 404 if the transaction does not exist or belongs to another user.
pub async fn delete_transaction_endpoint<T>(
    State(state): State<AppState<T>>,
    Path((user_id, transaction_id)): Path<(UserID, TransactionId)>,
) -> Result<StatusCode, Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    state
        .transaction_store
        .delete(transaction_id, user_id)
        .inspect_err(|error| {
            tracing::warn!("Could not delete transaction {transaction_id}: {error}")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        Error,
        endpoints::{self, format_endpoint, format_user_endpoint},
        stores::TransactionStore,
        test_utils::{assert_json_error, get_test_server},
        transaction::{Transaction, TransactionType},
        user::UserID,
    };

    #[tokio::test]
    async fn deletes_transaction_then_responds_not_found() {
        let (server, store) = get_test_server();
        let user_id = UserID::new(1);
        let transaction = store
            .create(Transaction::build(
                user_id,
                1.23,
                TransactionType::Expense,
                "Test",
            ))
            .unwrap();
        let endpoint = format_endpoint(
            &format_user_endpoint(endpoints::USER_TRANSACTION, user_id),
            transaction.id,
        );

        let response = server.delete(&endpoint).await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(store.get(transaction.id, user_id), Err(Error::NotFound));

        let response = server.delete(&endpoint).await;

        assert_json_error(&response, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let (server, store) = get_test_server();
        let owner = UserID::new(1);
        let transaction = store
            .create(Transaction::build(
                owner,
                1.23,
                TransactionType::Income,
                "Test",
            ))
            .unwrap();

        let response = server
            .delete(&format_endpoint(
                &format_user_endpoint(endpoints::USER_TRANSACTION, UserID::new(2)),
                transaction.id,
            ))
            .await;

        assert_json_error(&response, StatusCode::NOT_FOUND);
        assert_eq!(store.get(transaction.id, owner), Ok(transaction));
    }
}
