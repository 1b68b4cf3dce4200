//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/users/{user_id}/transactions', use
//! [format_user_endpoint] and [format_endpoint].

use crate::user::UserID;

/// The route to list or create a user's transactions.
pub const USER_TRANSACTIONS: &str = "/api/users/{user_id}/transactions";
/// The route for the totals of a user's transactions.
pub const USER_TRANSACTIONS_SUMMARY: &str = "/api/users/{user_id}/transactions/summary";
/// The route to access a single transaction of a user.
pub const USER_TRANSACTION: &str = "/api/users/{user_id}/transactions/{transaction_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Replace the `{user_id}` parameter in `endpoint_path` with `user_id`.
///
/// Any other parameters are left in place so they can be filled in with [format_endpoint].
pub fn format_user_endpoint(endpoint_path: &str, user_id: UserID) -> String {
    endpoint_path.replacen("{user_id}", &user_id.to_string(), 1)
}
