//! Budget progress and spending pace for a financial period.

use serde::Serialize;
use time::Date;

use crate::{amount::Amount, currency::format_currency, date_range::DateRange};

/// How much of the budget, or of the income when there is no budget, has been spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The budget limit, or the income when no budget is set.
    pub base: Amount,
    pub percentage: f64,
    /// Text shown after the percentage, e.g. "of $500 Budget".
    pub status: String,
}

impl BudgetProgress {
    pub fn new(expense: Amount, income: Amount, budget_limit: Amount, currency: &str) -> Self {
        let (base, status) = if budget_limit > 0 {
            (
                budget_limit,
                format!("of {} Budget", format_currency(budget_limit, currency)),
            )
        } else {
            (income, "of Income (No budget set)".to_owned())
        };

        let percentage = if base > 0 {
            expense as f64 / base as f64 * 100.0
        } else {
            0.0
        };

        Self {
            base,
            percentage,
            status,
        }
    }
}

/// The share of income kept, as a percentage. Zero without income.
pub fn savings_rate(income: Amount, expense: Amount) -> f64 {
    if income > 0 {
        (income - expense) as f64 / income as f64 * 100.0
    } else {
        0.0
    }
}

/// How quickly money is being spent over the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPace {
    pub days_in_period: i64,
    /// Days from the start of the period up to and including today, at least one.
    pub days_passed: i64,
    pub days_remaining: i64,
    pub daily_average: f64,
    /// The expense at the end of the period if spending continues at the daily average.
    pub projected_expense: f64,
}

impl SpendingPace {
    pub fn new(period: DateRange, expense: Amount, today: Date) -> Self {
        let days_in_period = period.len_days();
        let days_passed = ((today - period.start).whole_days() + 1).clamp(1, days_in_period);
        let days_remaining = (days_in_period - days_passed).max(0);
        let daily_average = expense as f64 / days_passed as f64;

        Self {
            days_in_period,
            days_passed,
            days_remaining,
            daily_average,
            projected_expense: daily_average * days_in_period as f64,
        }
    }
}
