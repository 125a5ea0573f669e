//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    ActionResult, AppState, Error, UserId,
    account::{Account, AccountType, map_row_to_account},
    amount::{Amount, parse_optional_balance},
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccountForm {
    /// The account name.
    #[serde(default)]
    pub name: String,
    /// One of bank, wallet, cash or investment.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// The opening balance, zero when left blank.
    #[serde(default)]
    pub balance: String,
}

/// A validated [AccountForm].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub balance: Amount,
}

impl TryFrom<&AccountForm> for NewAccount {
    type Error = Error;

    fn try_from(form: &AccountForm) -> Result<Self, Self::Error> {
        let name = form.name.trim();

        if name.is_empty() || form.account_type.trim().is_empty() {
            return Err(Error::MissingAccountFields);
        }

        Ok(Self {
            name: name.to_owned(),
            account_type: form.account_type.parse()?,
            balance: parse_optional_balance(&form.balance, "balance")?.unwrap_or(0),
        })
    }
}

/// A route handler for creating a new account, responds with an [ActionResult].
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<AccountForm>,
) -> Response {
    let new_account = match NewAccount::try_from(&form) {
        Ok(new_account) => new_account,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_account(user_id, &new_account, &connection) {
        Ok(account) => {
            tracing::info!("Created account {} for user {user_id}", account.id);
            ActionResult::success().into_response()
        }
        Err(error) => {
            tracing::error!("Could not create account with {form:?}: {error}");
            error.into_response()
        }
    }
}

/// Insert a new account for `user_id`.
///
/// # Errors
/// Returns [Error::DuplicateAccountName] if the user already has an account with the same name.
pub fn create_account(
    user_id: UserId,
    new_account: &NewAccount,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .query_one(
            "INSERT INTO account (user_id, name, type, balance) VALUES (?1, ?2, ?3, ?4)
            RETURNING id, user_id, name, type, balance",
            params![
                user_id,
                new_account.name,
                new_account.account_type,
                new_account.balance
            ],
            map_row_to_account,
        )
        .map_err(|error| match error {
            // Handle unique account name constraint violation
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicateAccountName(new_account.name.clone())
            }
            error => error.into(),
        })
}
