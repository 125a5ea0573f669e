//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};

use crate::{ActionResult, AppState, Error, UserId, account::AccountId};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing account.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account, responds with an [ActionResult].
///
/// Transactions that were routed through the account are kept and lose their
/// link to the account.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_account(account_id, user_id, &connection) {
        Ok(row_affected) if row_affected != 0 => ActionResult::success().into_response(),
        Ok(_) => Error::DeleteMissingAccount.into_response(),
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
            error.into_response()
        }
    }
}

type RowsAffected = usize;

fn delete_account(
    id: AccountId,
    user_id: UserId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )
        .map_err(Error::from)
}
