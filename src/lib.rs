//! Finance Tracker is a service for tracking personal finances.
//!
//! Users record accounts, categories and transactions, and read dashboards
//! summarizing net worth, income/expense flow and budget progress.
//!
//! This library provides a REST API that accepts form-encoded actions and
//! responds with JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod action;
mod amount;
mod app_state;
mod category;
mod currency;
mod dashboard;
mod database_id;
mod date_range;
mod db;
pub mod endpoints;
mod logging;
mod not_found;
mod routing;
mod settings;
mod timezone;
mod transaction;
mod user;

pub use action::ActionResult;
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use user::{USER_ID_HEADER, UserId};

use crate::{account::AccountId, category::CategoryId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid user ID.
    #[error("unauthorized access")]
    Unauthorized,

    /// A transaction form was missing the amount, date, category or account.
    #[error("one or more required transaction fields are missing")]
    MissingTransactionFields,

    /// The amount of a transaction was zero after parsing.
    ///
    /// Amounts are parsed by stripping every non-digit character, so negative
    /// and empty inputs also end up here.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// A transaction amount was above [amount::MAX_AMOUNT].
    #[error("the amount is above the maximum amount")]
    AmountTooLarge,

    /// An account balance would leave the range -[amount::MAX_AMOUNT] to [amount::MAX_AMOUNT].
    #[error("the account balance is outside of the supported range")]
    BalanceOutOfRange,

    /// A number could not be parsed from a form field.
    ///
    /// Callers should pass in the name of the field.
    #[error("could not parse a number for the field \"{0}\"")]
    InvalidNumber(&'static str),

    /// A date string did not have the format YYYY-MM-DD.
    #[error("could not parse the date \"{0}\"")]
    InvalidDate(String),

    /// An account form was missing the name or type.
    #[error("account name and type are required")]
    MissingAccountFields,

    /// An account update form had an empty or invalid field.
    #[error("invalid account data")]
    InvalidAccountData,

    /// The account type was not one of bank, wallet, cash or investment.
    #[error("\"{0}\" is not a valid account type")]
    InvalidAccountType(String),

    /// The specified account name already exists for the user.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// A category form was missing the name or type.
    #[error("category name and type are required")]
    MissingCategoryFields,

    /// A category update form was missing the name or type.
    #[error("category name and type are required for an update")]
    MissingCategoryUpdateFields,

    /// The category type was not one of income or expense.
    #[error("\"{0}\" is not a valid category type")]
    InvalidCategoryType(String),

    /// The category ID used for a transaction does not refer to one of the
    /// user's categories.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The account ID used for a transaction does not refer to one of the
    /// user's accounts.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// Tried to delete one of the built-in categories.
    #[error("the category \"{0}\" is a system category and cannot be deleted")]
    SystemCategory(String),

    /// Tried to delete a category that transactions still refer to.
    #[error("the category is still used by one or more transactions")]
    CategoryInUse,

    /// The full name in a profile form was empty.
    #[error("full name cannot be empty")]
    EmptyFullName,

    /// The period start day was outside of 1 to 28.
    #[error("{0} is not a valid start day, it must be between 1 and 28")]
    InvalidStartDay(i64),

    /// The monthly budget limit was negative.
    #[error("the budget limit cannot be negative")]
    NegativeBudgetLimit,

    /// The month query parameter did not have the format YYYY-MM.
    #[error("could not parse the month \"{0}\"")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to duplicate a transaction that does not exist
    #[error("tried to duplicate a transaction that is not in the database")]
    DuplicateMissingTransaction,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_action_response()
    }
}

impl Error {
    /// The HTTP status code and the message shown to the client for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access".to_owned()),
            Error::MissingTransactionFields => (
                StatusCode::BAD_REQUEST,
                "Please complete all required fields.".to_owned(),
            ),
            Error::NonPositiveAmount => (
                StatusCode::BAD_REQUEST,
                "Amount must be greater than 0.".to_owned(),
            ),
            Error::AmountTooLarge => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Amount cannot be more than {}.",
                    amount::MAX_AMOUNT
                ),
            ),
            Error::BalanceOutOfRange => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Account balances must be between -{0} and {0}.",
                    amount::MAX_AMOUNT
                ),
            ),
            Error::InvalidNumber(field) => (
                StatusCode::BAD_REQUEST,
                format!("The field \"{field}\" must be a whole number."),
            ),
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                format!("\"{date}\" is not a valid date, use the format YYYY-MM-DD."),
            ),
            Error::MissingAccountFields | Error::MissingCategoryFields => (
                StatusCode::BAD_REQUEST,
                "Name and Type are required".to_owned(),
            ),
            Error::InvalidAccountData => {
                (StatusCode::BAD_REQUEST, "Invalid data provided".to_owned())
            }
            Error::InvalidAccountType(account_type) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "\"{account_type}\" is not a valid account type. \
                    Choose one of bank, wallet, cash or investment."
                ),
            ),
            Error::DuplicateAccountName(name) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "The account {name} already exists. \
                    Choose a different account name, or edit or delete the existing account."
                ),
            ),
            Error::MissingCategoryUpdateFields => {
                (StatusCode::BAD_REQUEST, "Missing required fields".to_owned())
            }
            Error::InvalidCategoryType(category_type) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "\"{category_type}\" is not a valid category type. \
                    Choose either income or expense."
                ),
            ),
            Error::InvalidCategory(_) => (
                StatusCode::BAD_REQUEST,
                "Category resolution failed.".to_owned(),
            ),
            Error::InvalidAccount(_) => (
                StatusCode::BAD_REQUEST,
                "Account resolution failed.".to_owned(),
            ),
            Error::SystemCategory(name) => (
                StatusCode::BAD_REQUEST,
                format!("{name} is a system category and cannot be deleted."),
            ),
            Error::CategoryInUse => (
                StatusCode::BAD_REQUEST,
                "This category is used by existing transactions. \
                Move or delete those transactions first."
                    .to_owned(),
            ),
            Error::EmptyFullName => (StatusCode::BAD_REQUEST, "Name cannot be empty".to_owned()),
            Error::InvalidStartDay(day) => (
                StatusCode::BAD_REQUEST,
                format!("{day} is not a valid start day. Choose a day between 1 and 28."),
            ),
            Error::NegativeBudgetLimit => (
                StatusCode::BAD_REQUEST,
                "The budget limit cannot be negative.".to_owned(),
            ),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                format!("\"{month}\" is not a valid month, use the format YYYY-MM."),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "The requested resource could not be found.".to_owned(),
            ),
            Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DuplicateMissingTransaction => {
                (StatusCode::NOT_FOUND, "Transaction not found.".to_owned())
            }
            Error::UpdateMissingAccount | Error::DeleteMissingAccount => {
                (StatusCode::NOT_FOUND, "Account not found.".to_owned())
            }
            Error::UpdateMissingCategory | Error::DeleteMissingCategory => {
                (StatusCode::NOT_FOUND, "Category not found.".to_owned())
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A server error occurred.".to_owned(),
            ),
        }
    }

    /// Convert the error into a failed [ActionResult] with a matching status code.
    fn into_action_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status_code, ActionResult::failure(message)).into_response()
    }
}
