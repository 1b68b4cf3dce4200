use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};

use crate::{
    ErrorBody, build_router,
    stores::{SQLiteTransactionStore, sqlite::create_in_memory_app_state},
};

/// A test server for the app backed by an in-memory database.
///
/// The returned store shares the server's connection so tests can set up and inspect data directly.
pub(crate) fn get_test_server() -> (TestServer, SQLiteTransactionStore) {
    let state = create_in_memory_app_state().expect("Could not create app state.");
    let store = state.transaction_store.clone();
    let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

    (server, store)
}

#[track_caller]
pub(crate) fn assert_json_error(response: &TestResponse, status: StatusCode) {
    response.assert_status(status);

    let body = response.json::<ErrorBody>();
    assert!(!body.error.is_empty(), "error message should not be empty");
}
