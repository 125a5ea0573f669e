use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, OptionalExtension, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    amount::{Amount, is_valid_balance},
};

pub type AccountId = i64;

/// Where the money of an account is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A bank account.
    Bank,
    /// An e-wallet.
    Wallet,
    /// Physical cash.
    Cash,
    /// A brokerage or other investment account.
    Investment,
}

impl AccountType {
    /// All account types in display order.
    pub const ALL: [AccountType; 4] = [
        AccountType::Bank,
        AccountType::Wallet,
        AccountType::Cash,
        AccountType::Investment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "bank",
            AccountType::Wallet => "wallet",
            AccountType::Cash => "cash",
            AccountType::Investment => "investment",
        }
    }

    /// The heading used when accounts are grouped by type.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Bank => "Bank Accounts",
            AccountType::Wallet => "E-Wallets",
            AccountType::Cash => "Cash",
            AccountType::Investment => "Investments",
        }
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bank" => Ok(AccountType::Bank),
            "wallet" => Ok(AccountType::Wallet),
            "cash" => Ok(AccountType::Cash),
            "investment" => Ok(AccountType::Investment),
            _ => Err(Error::InvalidAccountType(s.to_owned())),
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user-owned bucket of money with a cached balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The user who owns the account.
    pub user_id: UserId,
    /// The name of the account, unique per user.
    pub name: String,
    /// Where the money is kept.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// The running total of the account.
    ///
    /// Starts at the balance the account was created with and moves with
    /// every transaction routed through the account.
    pub balance: Amount,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            balance INTEGER NOT NULL DEFAULT 0,
            UNIQUE(user_id, name)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let name = row.get(2)?;
    let account_type = row.get(3)?;
    let balance = row.get(4)?;

    Ok(Account {
        id,
        user_id,
        name,
        account_type,
        balance,
    })
}

/// Get one of the user's accounts by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to another user.
pub fn get_account(id: AccountId, user_id: UserId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            "SELECT id, user_id, name, type, balance FROM account WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get all of the user's accounts, largest balance first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_accounts(user_id: UserId, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, balance FROM account
            WHERE user_id = ?1
            ORDER BY balance DESC, name ASC",
        )?
        .query_map(params![user_id], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Get the total balance across all of the user's accounts, i.e. their net worth.
///
/// # Errors
/// Returns [Error] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub fn get_total_account_balance(user_id: UserId, connection: &Connection) -> Result<Amount, Error> {
    let mut stmt =
        connection.prepare("SELECT COALESCE(SUM(balance), 0) FROM account WHERE user_id = ?1")?;

    let total: Amount = stmt.query_row(params![user_id], |row| row.get(0))?;

    Ok(total)
}

type RowsAffected = usize;

/// Add `delta` to the balance of the account `id`.
///
/// Use a negative `delta` to take money out of the account.
///
/// # Errors
/// Returns [Error::BalanceOutOfRange] if the new balance would be outside of
/// the supported range. The stored balance is left unchanged.
pub fn adjust_account_balance(
    id: AccountId,
    delta: Amount,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let balance: Option<Amount> = connection
        .query_row(
            "SELECT balance FROM account WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(balance) = balance else {
        return Ok(0);
    };

    let new_balance = balance
        .checked_add(delta)
        .filter(|&balance| is_valid_balance(balance))
        .ok_or(Error::BalanceOutOfRange)?;

    connection
        .execute(
            "UPDATE account SET balance = ?1 WHERE id = ?2",
            params![new_balance, id],
        )
        .map_err(Error::from)
}

#[cfg(test)]
pub mod test_utils {
    use rusqlite::{Connection, params};

    use crate::{UserId, amount::Amount};

    use super::{Account, AccountType, map_row_to_account};

    /// Insert an account directly into the database.
    #[track_caller]
    pub fn insert_account(
        user_id: UserId,
        name: &str,
        balance: Amount,
        connection: &Connection,
    ) -> Account {
        connection
            .query_one(
                "INSERT INTO account (user_id, name, type, balance) VALUES (?1, ?2, ?3, ?4)
                RETURNING id, user_id, name, type, balance",
                params![user_id, name, AccountType::Bank, balance],
                map_row_to_account,
            )
            .expect("could not insert test account")
    }
}
