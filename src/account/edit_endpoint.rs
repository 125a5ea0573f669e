//! Defines the endpoint for updating an account
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    ActionResult, AppState, Error, UserId,
    account::{AccountId, AccountType},
    amount::{Amount, parse_optional_balance},
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating an account.
///
/// Unlike creation, every field is required. The balance overwrites the
/// stored balance, which lets users reconcile an account with their bank.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EditAccountForm {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub balance: String,
}

#[derive(Debug, PartialEq)]
struct AccountUpdate {
    name: String,
    account_type: AccountType,
    balance: Amount,
}

impl TryFrom<&EditAccountForm> for AccountUpdate {
    type Error = Error;

    fn try_from(form: &EditAccountForm) -> Result<Self, Self::Error> {
        let name = form.name.trim();

        if name.is_empty() || form.account_type.trim().is_empty() {
            return Err(Error::InvalidAccountData);
        }

        let balance = match parse_optional_balance(&form.balance, "balance") {
            Ok(Some(balance)) => balance,
            Err(Error::BalanceOutOfRange) => return Err(Error::BalanceOutOfRange),
            Ok(None) | Err(_) => return Err(Error::InvalidAccountData),
        };

        Ok(Self {
            name: name.to_owned(),
            account_type: form.account_type.parse()?,
            balance,
        })
    }
}

pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<EditAccountForm>,
) -> Response {
    let update = match AccountUpdate::try_from(&form) {
        Ok(update) => update,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_account(account_id, user_id, &update, &connection) {
        Ok(rows_affected) if rows_affected != 0 => ActionResult::success().into_response(),
        Ok(_) => Error::UpdateMissingAccount.into_response(),
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
            error.into_response()
        }
    }
}

type RowsAffected = usize;

fn update_account(
    id: AccountId,
    user_id: UserId,
    account: &AccountUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE account
        SET \
            name = ?1, \
            type = ?2, \
            balance = ?3 \
        WHERE id = ?4 AND user_id = ?5;",
            params![
                account.name,
                account.account_type,
                account.balance,
                id,
                user_id
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicateAccountName(account.name.clone())
            }
            error => error.into(),
        })
}
