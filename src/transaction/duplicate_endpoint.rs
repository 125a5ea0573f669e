//! Defines the endpoint for duplicating a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, TransactionBehavior};
use time::Date;

use crate::{
    ActionResult, AppState, Error, UserId,
    category::get_category,
    timezone::local_today,
    transaction::{
        Transaction, TransactionFields, TransactionId,
        balance::apply_balance_effect,
        core::{get_transaction, insert_transaction},
    },
};

/// The state needed to duplicate a transaction.
#[derive(Debug, Clone)]
pub struct DuplicateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DuplicateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that copies a transaction to today, responds with an [ActionResult].
pub async fn duplicate_transaction_endpoint(
    State(state): State<DuplicateTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match duplicate_transaction(transaction_id, user_id, today, &connection) {
        Ok(copy) => {
            tracing::info!("Duplicated transaction {transaction_id} as {}", copy.id);
            ActionResult::success().into_response()
        }
        Err(error) => {
            tracing::error!("Could not duplicate transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

/// Copy a transaction to `today` and apply its effect again.
///
/// The copy keeps the amount, category and account, and its description gets
/// the suffix " (Copy)".
///
/// # Errors
/// Returns [Error::DuplicateMissingTransaction] if the user has no transaction with `id`.
pub fn duplicate_transaction(
    id: TransactionId,
    user_id: UserId,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let tx = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let original = match get_transaction(id, user_id, &tx) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DuplicateMissingTransaction),
        Err(error) => return Err(error),
    };
    let category_type = get_category(original.category_id, user_id, &tx)?.category_type;

    let fields = TransactionFields {
        amount: original.amount,
        description: format!("{} (Copy)", original.description),
        date: today,
        category_id: original.category_id,
        account_id: original.account_id,
    };
    let copy = insert_transaction(user_id, &fields, &tx)?;
    apply_balance_effect(copy.account_id, copy.amount, category_type, &tx)?;

    tx.commit()?;

    Ok(copy)
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
        transaction::{TransactionFields, create_endpoint::create_transaction, core::get_transaction},
    };

    use super::{DuplicateTransactionState, duplicate_transaction, duplicate_transaction_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn copies_to_today_and_applies_effect_again() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let bank = insert_account(user_id, "Bank", 1_000, &conn);
        let original = create_transaction(
            user_id,
            &TransactionFields {
                amount: 150,
                description: "Coffee beans".to_owned(),
                date: date!(2025 - 09 - 01),
                category_id: food.id,
                account_id: Some(bank.id),
            },
            &conn,
        )
        .unwrap();
        let today = date!(2025 - 10 - 17);

        let copy = duplicate_transaction(original.id, user_id, today, &conn).unwrap();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.description, "Coffee beans (Copy)");
        assert_eq!(copy.date, today);
        assert_eq!(copy.amount, 150);
        assert_eq!(copy.category_id, food.id);
        assert_eq!(copy.account_id, Some(bank.id));
        assert_eq!(get_account(bank.id, user_id, &conn).unwrap().balance, 700);
    }

    #[test]
    fn missing_transaction_is_reported() {
        let conn = get_test_connection();

        assert_eq!(
            duplicate_transaction(9, UserId::new(1), date!(2025 - 10 - 17), &conn),
            Err(Error::DuplicateMissingTransaction)
        );
    }

    #[tokio::test]
    async fn endpoint_duplicates_transaction() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let salary = must_create_category(user_id, "Salary", CategoryType::Income, &conn);
        let bank = insert_account(user_id, "Bank", 0, &conn);
        let original = create_transaction(
            user_id,
            &TransactionFields {
                amount: 1_000,
                description: "Freelance".to_owned(),
                date: date!(2025 - 10 - 01),
                category_id: salary.id,
                account_id: Some(bank.id),
            },
            &conn,
        )
        .unwrap();
        let state = DuplicateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response =
            duplicate_transaction_endpoint(State(state.clone()), Extension(user_id), Path(original.id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(bank.id, user_id, &connection).unwrap().balance, 2_000);
        let copy = get_transaction(original.id + 1, user_id, &connection).unwrap();
        assert_eq!(copy.description, "Freelance (Copy)");
    }
}
