//! Defines the endpoints for reading a user's transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, ValidationError,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{
        CategoryName, SortOrder, TimestampRange, Transaction, TransactionQuery, TransactionType,
    },
    user::UserID,
};

/// The query parameters for listing transactions.
///
/// All parameters are optional, without any of them every transaction of the
/// user is returned newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTransactionsParams {
    /// Only include "income" or "expense" transactions.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
    /// The earliest timestamp to include, in RFC 3339 format.
    pub from: Option<String>,
    /// The latest timestamp to include, in RFC 3339 format.
    pub to: Option<String>,
    /// "asc" for oldest first or "desc" for newest first.
    pub sort: Option<String>,
    /// The maximum number of transactions to return.
    pub limit: Option<u64>,
    /// The number of transactions to skip.
    pub offset: Option<u64>,
}

impl ListTransactionsParams {
    fn into_query(self, user_id: UserID) -> Result<TransactionQuery, ValidationError> {
        Ok(TransactionQuery {
            user_id,
            transaction_type: self
                .transaction_type
                .as_deref()
                .map(str::parse::<TransactionType>)
                .transpose()?,
            category: self
                .category
                .as_deref()
                .map(CategoryName::new)
                .transpose()?,
            timestamp_range: TimestampRange::parse(self.from.as_deref(), self.to.as_deref())?,
            sort_order: self
                .sort
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()?
                .unwrap_or_default(),
            limit: self.limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// A route handler for listing a user's transactions.
pub async fn list_transactions_endpoint<T>(
    State(state): State<AppState<T>>,
    Path(user_id): Path<UserID>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    let query = params.into_query(user_id)?;

    state.transaction_store.query(query).map(Json)
}

/// A route handler for getting a single transaction of a user.
///
/// Responds with 404 if the transaction does not exist or belongs to another user,
/// so that clients cannot tell the two cases apart.
pub async fn get_transaction_endpoint<T>(
    State(state): State<AppState<T>>,
    Path((user_id, transaction_id)): Path<(UserID, TransactionId)>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    state
        .transaction_store
        .get(transaction_id, user_id)
        .map(Json)
}

#[cfg(test)]
mod list_transactions_tests {
    use axum::http::StatusCode;
    use time::macros::datetime;

    use crate::{
        SQLiteTransactionStore,
        endpoints::{self, format_endpoint, format_user_endpoint},
        stores::TransactionStore,
        test_utils::{assert_json_error, get_test_server},
        transaction::{Transaction, TransactionType},
        user::UserID,
    };

    const USER_1: UserID = UserID::new(1);
    const USER_2: UserID = UserID::new(2);

    fn create_transactions(store: &SQLiteTransactionStore) -> Vec<Transaction> {
        [
            (USER_1, 100.0, TransactionType::Expense, "food", datetime!(2025-10-03 00:00 UTC)),
            (USER_1, 50.0, TransactionType::Income, "salary", datetime!(2025-10-02 00:00 UTC)),
            (USER_1, 20.0, TransactionType::Expense, "transport", datetime!(2025-10-01 00:00 UTC)),
            (USER_2, 10.0, TransactionType::Expense, "food", datetime!(2025-10-04 00:00 UTC)),
        ]
        .into_iter()
        .map(|(user_id, amount, transaction_type, category, timestamp)| {
            store
                .create(
                    Transaction::build(user_id, amount, transaction_type, category)
                        .timestamp(timestamp),
                )
                .expect("Could not create transaction")
        })
        .collect()
    }

    #[tokio::test]
    async fn lists_only_the_users_transactions_newest_first() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);

        let response = server
            .get(&format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Vec<Transaction>>(),
            transactions[..3].to_vec()
        );
    }

    #[tokio::test]
    async fn lists_oldest_first() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);

        let response = server
            .get(&format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1))
            .add_query_param("sort", "asc")
            .await;

        response.assert_status_ok();
        let want: Vec<_> = transactions[..3].iter().rev().cloned().collect();
        assert_eq!(response.json::<Vec<Transaction>>(), want);
    }

    #[tokio::test]
    async fn filters_by_type_and_category() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);
        let endpoint = format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1);

        let by_type = server
            .get(&endpoint)
            .add_query_param("type", "income")
            .await;
        let by_category = server
            .get(&endpoint)
            .add_query_param("category", "food")
            .await;

        assert_eq!(
            by_type.json::<Vec<Transaction>>(),
            vec![transactions[1].clone()]
        );
        assert_eq!(
            by_category.json::<Vec<Transaction>>(),
            vec![transactions[0].clone()]
        );
    }

    #[tokio::test]
    async fn filters_by_range_with_paging() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);

        let response = server
            .get(&format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1))
            .add_query_param("from", "2025-10-01T00:00:00Z")
            .add_query_param("to", "2025-10-02T00:00:00Z")
            .add_query_param("limit", 1)
            .add_query_param("offset", 1)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Vec<Transaction>>(),
            vec![transactions[2].clone()]
        );
    }

    #[tokio::test]
    async fn offset_past_the_largest_integer_is_empty() {
        let (server, store) = get_test_server();
        create_transactions(&store);
        let endpoint = format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1);

        let without_limit = server
            .get(&endpoint)
            .add_query_param("offset", u64::MAX)
            .await;
        let with_limit = server
            .get(&endpoint)
            .add_query_param("limit", 1)
            .add_query_param("offset", u64::MAX)
            .await;

        without_limit.assert_status_ok();
        assert_eq!(without_limit.json::<Vec<Transaction>>(), vec![]);
        with_limit.assert_status_ok();
        assert_eq!(with_limit.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn user_without_transactions_gets_empty_list() {
        let (server, store) = get_test_server();
        create_transactions(&store);

        let response = server
            .get(&format_user_endpoint(
                endpoints::USER_TRANSACTIONS,
                UserID::new(99),
            ))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn invalid_filters_are_bad_requests() {
        let (server, _) = get_test_server();
        let endpoint = format_user_endpoint(endpoints::USER_TRANSACTIONS, USER_1);

        for (key, value) in [
            ("type", "transfer"),
            ("sort", "sideways"),
            ("from", "last tuesday"),
            ("category", " "),
        ] {
            let response = server.get(&endpoint).add_query_param(key, value).await;

            assert_json_error(&response, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn gets_transaction_by_id() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);

        let response = server
            .get(&format_endpoint(
                &format_user_endpoint(endpoints::USER_TRANSACTION, USER_1),
                transactions[0].id,
            ))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), transactions[0]);
    }

    #[tokio::test]
    async fn get_other_users_transaction_is_not_found() {
        let (server, store) = get_test_server();
        let transactions = create_transactions(&store);

        let response = server
            .get(&format_endpoint(
                &format_user_endpoint(endpoints::USER_TRANSACTION, USER_1),
                transactions[3].id,
            ))
            .await;

        assert_json_error(&response, StatusCode::NOT_FOUND);
    }
}
