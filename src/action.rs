//! The result object returned by every form action.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The outcome of a form action, serialized as `{"success": bool, "error": string|null}`.
///
/// Clients should show `error` to the user when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action completed.
    pub success: bool,
    /// A message describing why the action failed.
    pub error: Option<String>,
}

impl ActionResult {
    /// A result for an action that completed.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A result for an action that failed with `message`.
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
        }
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
