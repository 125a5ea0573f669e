//! Database query for the transaction history.

use rusqlite::{Connection, ToSql};
use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error, UserId,
    account::AccountId,
    amount::Amount,
    category::{CategoryId, CategoryType},
    date_range::{DateRange, month_bounds, previous_month, year_bounds},
    transaction::TransactionId,
};

/// The most transactions the history will show at once.
pub const HISTORY_LIMIT: usize = 200;

/// Which dates the history covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryRange {
    #[default]
    ThisMonth,
    LastMonth,
    ThisYear,
    All,
}

impl HistoryRange {
    /// Parse a query value, falling back to this month for unknown values.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            Some("last-month") => Self::LastMonth,
            Some("this-year") => Self::ThisYear,
            Some("all") => Self::All,
            _ => Self::ThisMonth,
        }
    }

    /// The dates covered relative to `today`, `None` for all dates.
    pub fn date_range(self, today: Date) -> Result<Option<DateRange>, Error> {
        let range = match self {
            Self::ThisMonth => month_bounds(today.year(), today.month())?,
            Self::LastMonth => {
                let (year, month): (i32, Month) = previous_month(today.year(), today.month());
                month_bounds(year, month)?
            }
            Self::ThisYear => year_bounds(today.year())?,
            Self::All => return Ok(None),
        };

        Ok(Some(range))
    }
}

/// The order to list transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Latest date first, then latest recorded first.
    #[default]
    Newest,
    Oldest,
    /// Largest amount first.
    Highest,
    Lowest,
}

impl SortOrder {
    /// Parse a query value, falling back to newest first for unknown values.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            Some("highest") => Self::Highest,
            Some("lowest") => Self::Lowest,
            _ => Self::Newest,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => "ORDER BY t.date DESC, t.created_at DESC, t.id DESC",
            Self::Oldest => "ORDER BY t.date ASC, t.created_at ASC, t.id ASC",
            Self::Highest => "ORDER BY t.amount DESC, t.id DESC",
            Self::Lowest => "ORDER BY t.amount ASC, t.id ASC",
        }
    }
}

/// The filters applied to the transaction history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub date_range: Option<DateRange>,
    pub category_type: Option<CategoryType>,
    pub category_id: Option<CategoryId>,
    pub account_id: Option<AccountId>,
    /// Case-insensitive text to look for in the description.
    pub search: Option<String>,
    pub sort: SortOrder,
}

/// A transaction joined with its category and account for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub amount: Amount,
    pub description: String,
    pub date: Date,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_type: CategoryType,
    pub category_color: String,
    pub category_icon: String,
    pub account_id: Option<AccountId>,
    /// `None` once the account has been deleted.
    pub account_name: Option<String>,
}

/// Get up to `limit` of the user's transactions matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn query_transactions(
    user_id: UserId,
    filter: &HistoryFilter,
    limit: usize,
    connection: &Connection,
) -> Result<Vec<TransactionRow>, Error> {
    let mut conditions = vec!["t.user_id = ?".to_owned()];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

    if let Some(range) = filter.date_range {
        conditions.push("t.date BETWEEN ? AND ?".to_owned());
        params.push(Box::new(range.start));
        params.push(Box::new(range.end));
    }

    if let Some(category_type) = filter.category_type {
        conditions.push("c.type = ?".to_owned());
        params.push(Box::new(category_type));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push("t.category_id = ?".to_owned());
        params.push(Box::new(category_id));
    }

    if let Some(account_id) = filter.account_id {
        conditions.push("t.account_id = ?".to_owned());
        params.push(Box::new(account_id));
    }

    if let Some(search) = &filter.search {
        conditions.push("t.description LIKE ? ESCAPE '\\'".to_owned());
        params.push(Box::new(format!("%{}%", escape_like(search))));
    }

    params.push(Box::new(limit as i64));

    let query = format!(
        "SELECT t.id, t.amount, t.description, t.date, t.category_id, \
        c.name, c.type, c.color, c.icon, t.account_id, a.name \
        FROM \"transaction\" t \
        INNER JOIN category c ON t.category_id = c.id \
        LEFT JOIN account a ON t.account_id = a.id \
        WHERE {} \
        {} \
        LIMIT ?",
        conditions.join(" AND "),
        filter.sort.order_clause()
    );

    connection
        .prepare(&query)?
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok(TransactionRow {
                id: row.get(0)?,
                amount: row.get(1)?,
                description: row.get(2)?,
                date: row.get(3)?,
                category_id: row.get(4)?,
                category_name: row.get(5)?,
                category_type: row.get(6)?,
                category_color: row.get(7)?,
                category_icon: row.get(8)?,
                account_id: row.get(9)?,
                account_name: row.get(10)?,
            })
        })?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
