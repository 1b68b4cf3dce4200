//! Application router configuration.

use axum::{
    Router,
    routing::{get, put},
};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    stores::TransactionStore,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_summary_endpoint,
        get_transaction_endpoint, list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<T>(state: AppState<T>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::USER_TRANSACTIONS,
            get(list_transactions_endpoint::<T>).post(create_transaction_endpoint::<T>),
        )
        .route(
            endpoints::USER_TRANSACTIONS_SUMMARY,
            get(get_summary_endpoint::<T>),
        )
        .route(
            endpoints::USER_TRANSACTION,
            put(update_transaction_endpoint::<T>)
                .get(get_transaction_endpoint::<T>)
                .delete(delete_transaction_endpoint::<T>),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
