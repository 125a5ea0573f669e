//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, TransactionBehavior};

use crate::{
    ActionResult, AppState, Error, UserId,
    transaction::{
        Transaction, TransactionFields,
        balance::apply_balance_effect,
        core::insert_transaction,
        form::{TransactionForm, resolve_references},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with an [ActionResult].
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match TransactionFields::try_from(&form) {
        Ok(fields) => fields,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(user_id, &fields, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Created transaction {} for user {user_id}",
                transaction.id
            );
            ActionResult::success().into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}

/// Record a transaction and apply its effect to the account balance.
///
/// Both writes happen in one database transaction.
///
/// # Errors
/// Returns [Error::InvalidCategory] or [Error::InvalidAccount] if the category or
/// account is not one of the user's, or [Error::SqlError] on other SQL errors.
pub fn create_transaction(
    user_id: UserId,
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let category_type = resolve_references(fields, user_id, &tx)?;
    let transaction = insert_transaction(user_id, fields, &tx)?;
    apply_balance_effect(
        transaction.account_id,
        transaction.amount,
        category_type,
        &tx,
    )?;

    tx.commit()?;

    Ok(transaction)
}
