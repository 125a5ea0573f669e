//! Dashboard HTTP handler: gathers the period totals, budget progress,
//! spending pace, net worth, recent transactions and insight for one
//! financial period.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, UserId,
    account::get_total_account_balance,
    amount::Amount,
    dashboard::{
        aggregation::{CategoryExpense, get_expense_by_category, get_period_totals},
        insight::{Insight, InsightInput, generate_insight},
        period::{FinancialPeriod, parse_month_param},
        summary::{BudgetProgress, SpendingPace, savings_rate},
    },
    settings::{UserSettings, get_user_settings},
    timezone::local_today,
    transaction::{HistoryFilter, SortOrder, TransactionRow, query_transactions},
};

/// How many of the latest transactions the dashboard lists.
const RECENT_TRANSACTION_LIMIT: usize = 5;

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month the period starts in, formatted as YYYY-MM.
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: FinancialPeriod,
    pub currency: String,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub net_flow: Amount,
    pub net_worth: Amount,
    pub savings_rate: f64,
    pub budget: BudgetProgress,
    pub pace: SpendingPace,
    pub expense_by_category: Vec<CategoryExpense>,
    pub recent_transactions: Vec<TransactionRow>,
    pub insight: Insight,
}

/// Route handler for the dashboard.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_response();
        }
    };

    let month = match query
        .month
        .as_deref()
        .map(str::trim)
        .filter(|month| !month.is_empty())
        .map(parse_month_param)
        .transpose()
    {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match build_dashboard(user_id, month, today, &connection) {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(error) => {
            tracing::error!("Could not build dashboard for user {user_id}: {error}");
            error.into_response()
        }
    }
}

fn build_dashboard(
    user_id: UserId,
    month: Option<(i32, time::Month)>,
    today: Date,
    connection: &Connection,
) -> Result<Dashboard, Error> {
    let UserSettings {
        currency,
        budget_limit,
        start_day,
        ..
    } = get_user_settings(user_id, connection)?;

    let period = match month {
        Some((year, month)) => FinancialPeriod::starting_in(year, month, start_day)?,
        None => FinancialPeriod::containing(today, start_day)?,
    };

    let totals = get_period_totals(user_id, period.range, connection)?;
    let expense_by_category = get_expense_by_category(user_id, period.range, connection)?;
    let net_worth = get_total_account_balance(user_id, connection)?;
    let recent_transactions = query_transactions(
        user_id,
        &HistoryFilter {
            sort: SortOrder::Newest,
            ..Default::default()
        },
        RECENT_TRANSACTION_LIMIT,
        connection,
    )?;

    let savings_rate = savings_rate(totals.income, totals.expense);
    let insight = generate_insight(InsightInput {
        income: totals.income,
        expense: totals.expense,
        savings_rate,
        top_category: expense_by_category.first().map(|expense| expense.name.as_str()),
        currency: &currency,
    });

    Ok(Dashboard {
        budget: BudgetProgress::new(totals.expense, totals.income, budget_limit, &currency),
        pace: SpendingPace::new(period.range, totals.expense, today),
        period,
        total_income: totals.income,
        total_expense: totals.expense,
        net_flow: totals.income - totals.expense,
        net_worth,
        savings_rate,
        expense_by_category,
        recent_transactions,
        insight,
        currency,
    })
}
