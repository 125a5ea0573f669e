//! The rule that keeps account balances in step with their transactions.
//!
//! Income adds the amount to the account, expenses subtract it. Deleting a
//! transaction applies the inverse, and editing one reverts the old effect
//! before applying the new one.

use rusqlite::Connection;

use crate::{
    Error,
    account::{AccountId, adjust_account_balance},
    amount::Amount,
    category::CategoryType,
};

/// The change a transaction makes to its account's balance.
pub fn balance_effect(amount: Amount, category_type: CategoryType) -> Amount {
    match category_type {
        CategoryType::Expense => -amount,
        CategoryType::Income => amount,
    }
}

/// Apply the effect of a transaction to `account_id`.
///
/// Does nothing when the transaction is not linked to an account, or when the
/// account no longer exists.
pub fn apply_balance_effect(
    account_id: Option<AccountId>,
    amount: Amount,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(account_id) = account_id else {
        return Ok(());
    };

    let rows_affected =
        adjust_account_balance(account_id, balance_effect(amount, category_type), connection)?;

    if rows_affected == 0 {
        tracing::warn!("Skipped balance update for missing account {account_id}");
    }

    Ok(())
}

/// Undo the effect of a transaction on `account_id`.
pub fn revert_balance_effect(
    account_id: Option<AccountId>,
    amount: Amount,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(account_id) = account_id else {
        return Ok(());
    };

    let rows_affected = adjust_account_balance(
        account_id,
        -balance_effect(amount, category_type),
        connection,
    )?;

    if rows_affected == 0 {
        tracing::warn!("Skipped balance reversal for missing account {account_id}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        UserId,
        account::{get_account, test_utils::insert_account},
        category::CategoryType,
        initialize_db,
    };

    use super::{apply_balance_effect, balance_effect, revert_balance_effect};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    #[test]
    fn expense_is_negative_and_income_positive() {
        assert_eq!(balance_effect(500, CategoryType::Expense), -500);
        assert_eq!(balance_effect(500, CategoryType::Income), 500);
    }

    #[test]
    fn apply_then_revert_restores_balance() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let account = insert_account(user_id, "Bank", 1_000, &conn);

        apply_balance_effect(Some(account.id), 300, CategoryType::Expense, &conn).unwrap();
        assert_eq!(get_account(account.id, user_id, &conn).unwrap().balance, 700);

        revert_balance_effect(Some(account.id), 300, CategoryType::Expense, &conn).unwrap();
        assert_eq!(get_account(account.id, user_id, &conn).unwrap().balance, 1_000);
    }

    #[test]
    fn unlinked_transaction_is_skipped() {
        let conn = get_test_connection();

        assert_eq!(
            apply_balance_effect(None, 300, CategoryType::Income, &conn),
            Ok(())
        );
        assert_eq!(
            revert_balance_effect(None, 300, CategoryType::Income, &conn),
            Ok(())
        );
    }
}
