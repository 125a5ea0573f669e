//! Defines the endpoint for editing a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, TransactionBehavior};

use crate::{
    ActionResult, AppState, Error, UserId,
    category::get_category,
    transaction::{
        TransactionFields, TransactionId,
        balance::{apply_balance_effect, revert_balance_effect},
        core::{get_transaction, update_transaction_row},
        form::{TransactionForm, resolve_references},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match TransactionFields::try_from(&form) {
        Ok(fields) => fields,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_transaction(transaction_id, user_id, &fields, &connection) {
        Ok(()) => ActionResult::success().into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

/// Overwrite a transaction and move its balance effect.
///
/// The old effect is reverted on the old account, then the effect of the new
/// amount and category type is applied to the new account.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if the user has no transaction with `id`.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserId,
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let old = match get_transaction(id, user_id, &tx) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };
    let old_category_type = get_category(old.category_id, user_id, &tx)?.category_type;
    let new_category_type = resolve_references(fields, user_id, &tx)?;

    revert_balance_effect(old.account_id, old.amount, old_category_type, &tx)?;

    if update_transaction_row(id, user_id, fields, &tx)? == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    apply_balance_effect(fields.account_id, fields.amount, new_category_type, &tx)?;

    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
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
            TransactionFields, create_endpoint::create_transaction, form::TransactionForm,
            core::get_transaction,
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint, update_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn moves_effect_between_accounts_and_categories() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let refund = must_create_category(user_id, "Refund", CategoryType::Income, &conn);
        let bank = insert_account(user_id, "Bank", 1_000, &conn);
        let wallet = insert_account(user_id, "Wallet", 500, &conn);
        let transaction = create_transaction(
            user_id,
            &TransactionFields {
                amount: 200,
                description: "Dinner".to_owned(),
                date: date!(2025 - 10 - 10),
                category_id: food.id,
                account_id: Some(bank.id),
            },
            &conn,
        )
        .unwrap();
        assert_eq!(get_account(bank.id, user_id, &conn).unwrap().balance, 800);

        update_transaction(
            transaction.id,
            user_id,
            &TransactionFields {
                amount: 300,
                description: "Dinner refund".to_owned(),
                date: date!(2025 - 10 - 11),
                category_id: refund.id,
                account_id: Some(wallet.id),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(get_account(bank.id, user_id, &conn).unwrap().balance, 1_000);
        assert_eq!(get_account(wallet.id, user_id, &conn).unwrap().balance, 800);
        let got = get_transaction(transaction.id, user_id, &conn).unwrap();
        assert_eq!(got.amount, 300);
        assert_eq!(got.category_id, refund.id);
        assert_eq!(got.account_id, Some(wallet.id));
    }

    #[test]
    fn missing_transaction_is_reported() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let bank = insert_account(user_id, "Bank", 1_000, &conn);

        let result = update_transaction(
            42,
            user_id,
            &TransactionFields {
                amount: 300,
                description: "Dinner".to_owned(),
                date: date!(2025 - 10 - 11),
                category_id: food.id,
                account_id: Some(bank.id),
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(get_account(bank.id, user_id, &conn).unwrap().balance, 1_000);
    }

    #[tokio::test]
    async fn endpoint_updates_transaction() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let bank = insert_account(user_id, "Bank", 1_000, &conn);
        let transaction = create_transaction(
            user_id,
            &TransactionFields {
                amount: 100,
                description: "Coffee".to_owned(),
                date: date!(2025 - 10 - 10),
                category_id: food.id,
                account_id: Some(bank.id),
            },
            &conn,
        )
        .unwrap();
        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = TransactionForm {
            amount: "150".to_owned(),
            description: "Coffee and cake".to_owned(),
            date: "2025-10-10".to_owned(),
            category_id: food.id.to_string(),
            account_id: bank.id.to_string(),
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(transaction.id),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(bank.id, user_id, &connection).unwrap().balance, 850);
    }
}
