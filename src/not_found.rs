use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::ActionResult;

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        ActionResult::failure("The requested resource could not be found.".to_owned()),
    )
        .into_response()
}
