//! User identity supplied by the upstream authentication layer.
//!
//! This service does not authenticate users itself. A proxy in front of it
//! verifies the session and forwards the user's ID in [USER_ID_HEADER].

use std::fmt::Display;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The header that carries the ID of the authenticated user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// Middleware that reads the user ID from [USER_ID_HEADER].
///
/// The user ID is placed into the request extensions and the request executed normally if the
/// header holds an integer, otherwise an unauthorized error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>`
/// to receive the user ID.
pub async fn require_user(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(UserId::new);

    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        None => {
            tracing::warn!(
                "Rejected request to {} without a valid {USER_ID_HEADER} header",
                request.uri()
            );
            Error::Unauthorized.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use axum_test::TestServer;

    use crate::ActionResult;

    use super::{USER_ID_HEADER, UserId, require_user};

    async fn echo_user(Extension(user_id): Extension<UserId>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/protected", get(echo_user))
            .layer(middleware::from_fn(require_user));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_user_id_to_handler() {
        let server = get_test_server();

        let response = server
            .get("/protected")
            .add_header(USER_ID_HEADER, "42")
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "42");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let server = get_test_server();

        let response = server.get("/protected").expect_failure().await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let result: ActionResult = response.json();
        assert_eq!(result.error.as_deref(), Some("Unauthorized access"));
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get("/protected")
            .add_header(USER_ID_HEADER, "alice")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
