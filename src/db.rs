//! Database schema setup.

use rusqlite::{Connection, TransactionBehavior};

use crate::{
    Error, account::create_account_table, category::create_category_table,
    settings::create_user_settings_table, transaction::create_transaction_table,
};

/// Create the tables for all of the domain models.
///
/// Also enables foreign key enforcement on `connection`.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_user_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
