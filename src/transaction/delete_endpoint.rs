//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, TransactionBehavior};

use crate::{
    ActionResult, AppState, Error, UserId,
    category::get_category,
    transaction::{
        TransactionId,
        balance::revert_balance_effect,
        core::{delete_transaction_row, get_transaction},
    },
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an [ActionResult].
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(()) => ActionResult::success().into_response(),
        Err(Error::DeleteMissingTransaction) => Error::DeleteMissingTransaction.into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

/// Delete a transaction and reverse its effect on its account.
///
/// Transactions whose account was deleted are removed without touching any balance.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the user has no transaction with `id`.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let transaction = match get_transaction(id, user_id, &tx) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };
    let category_type = get_category(transaction.category_id, user_id, &tx)?.category_type;

    delete_transaction_row(id, user_id, &tx)?;
    revert_balance_effect(
        transaction.account_id,
        transaction.amount,
        category_type,
        &tx,
    )?;

    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserId,
        account::{get_account, test_utils::insert_account},
        category::{CategoryType, test_utils::must_create_category},
        db::initialize,
        transaction::{
            TransactionFields, create_endpoint::create_transaction, core::get_transaction,
            test_utils::insert_test_transaction,
        },
    };

    use super::{DeleteTransactionState, delete_transaction, delete_transaction_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn restores_balance() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let bank = insert_account(user_id, "Bank", 1_000, &conn);
        let transaction = create_transaction(
            user_id,
            &TransactionFields {
                amount: 400,
                description: "Shoes".to_owned(),
                date: date!(2025 - 10 - 01),
                category_id: food.id,
                account_id: Some(bank.id),
            },
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, user_id, &conn).unwrap();

        assert_eq!(get_account(bank.id, user_id, &conn).unwrap().balance, 1_000);
        assert_eq!(
            get_transaction(transaction.id, user_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn skips_reversal_for_unlinked_transaction() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let salary = must_create_category(user_id, "Salary", CategoryType::Income, &conn);
        let old_bank = insert_account(user_id, "Old bank", 0, &conn);
        let transaction = insert_test_transaction(
            user_id,
            700,
            date!(2025 - 10 - 01),
            salary.id,
            old_bank.id,
            &conn,
        );
        conn.execute("DELETE FROM account WHERE id = ?1", [old_bank.id])
            .unwrap();

        assert_eq!(delete_transaction(transaction.id, user_id, &conn), Ok(()));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response =
            delete_transaction_endpoint(State(state), Extension(UserId::new(1)), Path(1)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
