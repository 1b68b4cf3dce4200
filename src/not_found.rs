use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::ErrorBody;

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "the requested route does not exist".to_owned(),
        }),
    )
        .into_response()
}
