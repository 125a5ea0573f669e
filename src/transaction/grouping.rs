//! Grouping logic for the transaction history (day groups, totals).

use serde::Serialize;
use time::{Date, Duration};

use crate::{
    amount::Amount,
    category::CategoryType,
    date_range::{month_abbrev, weekday_abbrev},
};

use super::query::TransactionRow;

/// The transactions recorded on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub date: Date,
    /// "Today", "Yesterday" or a short date such as "Wed, Oct 15".
    pub label: String,
    pub transactions: Vec<TransactionRow>,
    pub total_income: Amount,
    pub total_expense: Amount,
}

/// Income and expense totals over a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlowTotals {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub net_flow: Amount,
}

impl FlowTotals {
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a TransactionRow>) -> Self {
        let mut totals = Self::default();

        for transaction in transactions {
            match transaction.category_type {
                CategoryType::Income => totals.total_income += transaction.amount,
                CategoryType::Expense => totals.total_expense += transaction.amount,
            }
        }

        totals.net_flow = totals.total_income - totals.total_expense;
        totals
    }
}

/// Group transactions by date.
///
/// Groups appear in the order their date first appears in `transactions`, so
/// the sort order of the query is kept. Transactions on a date that shows up
/// again later, e.g. when sorting by amount, join the existing group.
pub fn group_by_day(transactions: Vec<TransactionRow>, today: Date) -> Vec<DayGroup> {
    let mut days: Vec<DayGroup> = Vec::new();

    for transaction in transactions {
        let index = match days.iter().position(|day| day.date == transaction.date) {
            Some(index) => index,
            None => {
                days.push(DayGroup {
                    date: transaction.date,
                    label: day_label(transaction.date, today),
                    transactions: Vec::new(),
                    total_income: 0,
                    total_expense: 0,
                });
                days.len() - 1
            }
        };
        let day = &mut days[index];

        match transaction.category_type {
            CategoryType::Income => day.total_income += transaction.amount,
            CategoryType::Expense => day.total_expense += transaction.amount,
        }

        day.transactions.push(transaction);
    }

    days
}

/// A label for `date` relative to `today`.
///
/// The year is only included for dates outside the current year.
pub fn day_label(date: Date, today: Date) -> String {
    if date == today {
        return "Today".to_owned();
    }

    if date == today - Duration::days(1) {
        return "Yesterday".to_owned();
    }

    let label = format!(
        "{}, {} {}",
        weekday_abbrev(date.weekday()),
        month_abbrev(date.month()),
        date.day()
    );

    if date.year() == today.year() {
        label
    } else {
        format!("{label}, {}", date.year())
    }
}
