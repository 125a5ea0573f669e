//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error, UserId, account::AccountId, amount::Amount, category::CategoryId,
    database_id::DatabaseId,
};

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// The description given to transactions submitted without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive, the category decides whether the money
/// came in or went out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who recorded the transaction.
    pub user_id: UserId,
    /// The amount of money spent or earned in this transaction.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The account the money moved through.
    ///
    /// `None` once the account has been deleted.
    pub account_id: Option<AccountId>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

/// The user-editable fields of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub amount: Amount,
    pub description: String,
    pub date: Date,
    pub category_id: CategoryId,
    /// Always set for submitted forms, `None` only when copying an unlinked transaction.
    pub account_id: Option<AccountId>,
}

/// Insert a new transaction for `user_id`.
///
/// This only writes the row, account balances are left untouched.
pub fn insert_transaction(
    user_id: UserId,
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, description, date, category_id, account_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, description, date, category_id, account_id, created_at",
        )?
        .query_row(
            params![
                user_id,
                fields.amount,
                fields.description,
                fields.date,
                fields.category_id,
                fields.account_id,
                OffsetDateTime::now_utc(),
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(fields.category_id),
            error => error.into(),
        })
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, description, date, category_id, account_id, created_at
            FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            rusqlite::named_params! {":id": id, ":user_id": user_id},
            map_transaction_row,
        )?;

    Ok(transaction)
}

type RowsAffected = usize;

/// Overwrite the editable fields of a transaction.
pub fn update_transaction_row(
    id: TransactionId,
    user_id: UserId,
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\"
        SET \
            amount = ?1, \
            description = ?2, \
            date = ?3, \
            category_id = ?4, \
            account_id = ?5 \
        WHERE id = ?6 AND user_id = ?7;",
            params![
                fields.amount,
                fields.description,
                fields.date,
                fields.category_id,
                fields.account_id,
                id,
                user_id
            ],
        )
        .map_err(Error::from)
}

/// Delete a transaction row, leaving account balances untouched.
pub fn delete_transaction_row(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )
        .map_err(Error::from)
}

/// Create the transaction table in the database.
///
/// Deleting an account keeps its transactions but unlinks them. Deleting a
/// category that is still referenced fails.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                account_id INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Used by the dashboard and the transaction history.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let date = row.get(4)?;
    let category_id = row.get(5)?;
    let account_id = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        user_id,
        amount,
        description,
        date,
        category_id,
        account_id,
        created_at,
    })
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserId,
        account::test_utils::insert_account,
        category::{CategoryType, test_utils::must_create_category},
        db::initialize,
        transaction::TransactionFields,
    };

    use super::{delete_transaction_row, get_transaction, insert_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_and_get() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let account = insert_account(user_id, "Cash", 0, &conn);
        let fields = TransactionFields {
            amount: 25_000,
            description: "Lunch".to_owned(),
            date: date!(2025 - 10 - 05),
            category_id: category.id,
            account_id: Some(account.id),
        };

        let inserted = insert_transaction(user_id, &fields, &conn).unwrap();
        let got = get_transaction(inserted.id, user_id, &conn).unwrap();

        assert_eq!(got, inserted);
        assert_eq!(got.account_id, Some(account.id));
        assert_eq!(got.amount, 25_000);
    }

    #[test]
    fn insert_fails_on_invalid_category() {
        let conn = get_test_connection();
        let account = insert_account(UserId::new(1), "Cash", 0, &conn);
        let fields = TransactionFields {
            amount: 1,
            description: String::new(),
            date: date!(2025 - 10 - 05),
            category_id: 42,
            account_id: Some(account.id),
        };

        let result = insert_transaction(UserId::new(1), &fields, &conn);

        assert_eq!(result, Err(Error::InvalidCategory(42)));
    }

    #[test]
    fn other_users_transaction_is_not_found() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let account = insert_account(user_id, "Cash", 0, &conn);
        let fields = TransactionFields {
            amount: 10,
            description: "Snack".to_owned(),
            date: date!(2025 - 10 - 05),
            category_id: category.id,
            account_id: Some(account.id),
        };
        let inserted = insert_transaction(user_id, &fields, &conn).unwrap();

        assert_eq!(
            get_transaction(inserted.id, UserId::new(2), &conn),
            Err(Error::NotFound)
        );
        assert_eq!(
            delete_transaction_row(inserted.id, UserId::new(2), &conn),
            Ok(0)
        );
    }

    #[test]
    fn deleting_account_unlinks_transactions() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let category = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let account = insert_account(user_id, "Cash", 0, &conn);
        let fields = TransactionFields {
            amount: 10,
            description: "Snack".to_owned(),
            date: date!(2025 - 10 - 05),
            category_id: category.id,
            account_id: Some(account.id),
        };
        let inserted = insert_transaction(user_id, &fields, &conn).unwrap();

        conn.execute("DELETE FROM account WHERE id = ?1", [account.id])
            .unwrap();

        let got = get_transaction(inserted.id, user_id, &conn).unwrap();
        assert_eq!(got.account_id, None);
    }
}
