//! Database aggregation of the transactions in a financial period.

use rusqlite::{Connection, params};
use serde::Serialize;

use crate::{
    Error, UserId, amount::Amount, category::CategoryType, date_range::DateRange,
};

/// Income and expense totals of a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Amount,
    pub expense: Amount,
}

/// The amount spent on one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryExpense {
    pub name: String,
    pub color: String,
    pub value: Amount,
}

/// Sum the user's income and expenses between the dates of `range`.
pub fn get_period_totals(
    user_id: UserId,
    range: DateRange,
    connection: &Connection,
) -> Result<PeriodTotals, Error> {
    let mut statement = connection.prepare(
        "SELECT c.type, SUM(t.amount) FROM \"transaction\" t
        INNER JOIN category c ON t.category_id = c.id
        WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3
        GROUP BY c.type",
    )?;

    let mut totals = PeriodTotals::default();
    let rows = statement.query_map(params![user_id, range.start, range.end], |row| {
        Ok((row.get::<_, CategoryType>(0)?, row.get::<_, Amount>(1)?))
    })?;

    for row in rows {
        match row? {
            (CategoryType::Income, total) => totals.income = total,
            (CategoryType::Expense, total) => totals.expense = total,
        }
    }

    Ok(totals)
}

/// Sum the user's expenses per category name, largest first.
pub fn get_expense_by_category(
    user_id: UserId,
    range: DateRange,
    connection: &Connection,
) -> Result<Vec<CategoryExpense>, Error> {
    connection
        .prepare(
            "SELECT c.name, MIN(c.color), SUM(t.amount) AS total FROM \"transaction\" t
            INNER JOIN category c ON t.category_id = c.id
            WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3 AND c.type = 'expense'
            GROUP BY c.name
            ORDER BY total DESC, c.name ASC",
        )?
        .query_map(params![user_id, range.start, range.end], |row| {
            Ok(CategoryExpense {
                name: row.get(0)?,
                color: row.get(1)?,
                value: row.get(2)?,
            })
        })?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        UserId,
        account::test_utils::insert_account,
        category::{CategoryType, test_utils::must_create_category},
        date_range::DateRange,
        initialize_db,
        transaction::test_utils::insert_test_transaction,
    };

    use super::{PeriodTotals, get_expense_by_category, get_period_totals};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        conn
    }

    const OCTOBER: DateRange = DateRange {
        start: date!(2025 - 10 - 01),
        end: date!(2025 - 10 - 31),
    };

    #[test]
    fn totals_only_count_the_period() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let salary = must_create_category(user_id, "Salary", CategoryType::Income, &conn);
        let bank = insert_account(user_id, "Bank", 0, &conn);
        insert_test_transaction(user_id, 5_000, date!(2025 - 10 - 01), salary.id, bank.id, &conn);
        insert_test_transaction(user_id, 300, date!(2025 - 10 - 31), food.id, bank.id, &conn);
        insert_test_transaction(user_id, 200, date!(2025 - 10 - 15), food.id, bank.id, &conn);
        insert_test_transaction(user_id, 999, date!(2025 - 11 - 01), food.id, bank.id, &conn);

        let totals = get_period_totals(user_id, OCTOBER, &conn).unwrap();

        assert_eq!(
            totals,
            PeriodTotals {
                income: 5_000,
                expense: 500,
            }
        );
    }

    #[test]
    fn empty_period_has_zero_totals() {
        let conn = get_test_connection();

        let totals = get_period_totals(UserId::new(1), OCTOBER, &conn).unwrap();

        assert_eq!(totals, PeriodTotals::default());
    }

    #[test]
    fn expenses_grouped_by_category_largest_first() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let rent = must_create_category(user_id, "Rent", CategoryType::Expense, &conn);
        let salary = must_create_category(user_id, "Salary", CategoryType::Income, &conn);
        let bank = insert_account(user_id, "Bank", 0, &conn);
        insert_test_transaction(user_id, 100, date!(2025 - 10 - 02), food.id, bank.id, &conn);
        insert_test_transaction(user_id, 150, date!(2025 - 10 - 03), food.id, bank.id, &conn);
        insert_test_transaction(user_id, 2_000, date!(2025 - 10 - 01), rent.id, bank.id, &conn);
        insert_test_transaction(user_id, 9_000, date!(2025 - 10 - 01), salary.id, bank.id, &conn);

        let expenses = get_expense_by_category(user_id, OCTOBER, &conn).unwrap();

        let got: Vec<_> = expenses
            .iter()
            .map(|expense| (expense.name.as_str(), expense.value))
            .collect();
        assert_eq!(got, vec![("Rent", 2_000), ("Food", 250)]);
    }
}
