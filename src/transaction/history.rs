//! The transaction history: filtered, sorted and grouped by day.

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
    account::{AccountId, get_accounts},
    category::{CategoryId, CategoryType, get_all_categories},
    timezone::local_today,
    transaction::{
        grouping::{DayGroup, FlowTotals, group_by_day},
        query::{HISTORY_LIMIT, HistoryFilter, HistoryRange, SortOrder, query_transactions},
    },
};

/// The state needed for the transaction history.
#[derive(Debug, Clone)]
pub struct TransactionHistoryState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionHistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the transaction history.
///
/// Filters set to "all" or left out are not applied.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub range: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl HistoryQuery {
    fn into_filter(self, today: Date) -> Result<HistoryFilter, Error> {
        let category_type = match selected(self.category_type.as_deref()) {
            Some(category_type) => Some(category_type.parse::<CategoryType>()?),
            None => None,
        };
        let category_id = parse_id(self.category.as_deref(), "category")?;
        let account_id = parse_id(self.account.as_deref(), "account")?;
        let search = self
            .search
            .map(|search| search.trim().to_owned())
            .filter(|search| !search.is_empty());

        let date_range = HistoryRange::from_query_value(self.range.as_deref()).date_range(today)?;

        Ok(HistoryFilter {
            date_range,
            category_type,
            category_id,
            account_id,
            search,
            sort: SortOrder::from_query_value(self.sort.as_deref()),
        })
    }
}

fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "all")
}

fn parse_id(value: Option<&str>, field: &'static str) -> Result<Option<i64>, Error> {
    selected(value)
        .map(|id| id.parse().map_err(|_| Error::InvalidNumber(field)))
        .transpose()
}

/// A category offered as a filter option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// An account offered as a filter option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountOption {
    pub id: AccountId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionHistory {
    pub count: usize,
    #[serde(flatten)]
    pub totals: FlowTotals,
    pub groups: Vec<DayGroup>,
    pub categories: Vec<CategoryOption>,
    pub accounts: Vec<AccountOption>,
}

/// Route handler for the transaction history.
pub async fn get_transaction_history(
    State(state): State<TransactionHistoryState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_response();
        }
    };

    let filter = match query.into_filter(today) {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_history(user_id, &filter, today, &connection) {
        Ok(history) => Json(history).into_response(),
        Err(error) => {
            tracing::error!("Could not get transaction history for user {user_id}: {error}");
            error.into_response()
        }
    }
}

fn get_history(
    user_id: UserId,
    filter: &HistoryFilter,
    today: Date,
    connection: &Connection,
) -> Result<TransactionHistory, Error> {
    let transactions = query_transactions(user_id, filter, HISTORY_LIMIT, connection)?;
    let totals = FlowTotals::new(&transactions);
    let count = transactions.len();

    let categories = get_all_categories(user_id, connection)?
        .into_iter()
        .map(|category| CategoryOption {
            id: category.id,
            name: category.name,
            category_type: category.category_type,
        })
        .collect();

    let mut accounts: Vec<AccountOption> = get_accounts(user_id, connection)?
        .into_iter()
        .map(|account| AccountOption {
            id: account.id,
            name: account.name,
        })
        .collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(TransactionHistory {
        count,
        totals,
        groups: group_by_day(transactions, today),
        categories,
        accounts,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::{Duration, macros::date};

    use crate::{
        Error, UserId,
        account::test_utils::insert_account,
        category::{CategoryType, test_utils::must_create_category},
        db::initialize,
        timezone::local_today,
        transaction::test_utils::insert_test_transaction,
    };

    use super::{HistoryQuery, TransactionHistoryState, get_history, get_transaction_history};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn all_means_no_filter() {
        let query = HistoryQuery {
            category_type: Some("all".to_owned()),
            category: Some("all".to_owned()),
            account: Some("".to_owned()),
            search: Some("  ".to_owned()),
            ..Default::default()
        };

        let filter = query.into_filter(date!(2025 - 10 - 17)).unwrap();

        assert_eq!(filter.category_type, None);
        assert_eq!(filter.category_id, None);
        assert_eq!(filter.account_id, None);
        assert_eq!(filter.search, None);
    }

    #[test]
    fn invalid_ids_are_rejected() {
        let query = HistoryQuery {
            account: Some("bank".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.into_filter(date!(2025 - 10 - 17)),
            Err(Error::InvalidNumber("account"))
        );
    }

    #[test]
    fn history_has_totals_and_groups() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let salary = must_create_category(user_id, "Salary", CategoryType::Income, &conn);
        let bank = insert_account(user_id, "Bank", 0, &conn);
        let today = date!(2025 - 10 - 17);
        insert_test_transaction(user_id, 1_000, today, salary.id, bank.id, &conn);
        insert_test_transaction(user_id, 200, today, food.id, bank.id, &conn);
        insert_test_transaction(user_id, 50, today - Duration::days(1), food.id, bank.id, &conn);
        let filter = HistoryQuery::default().into_filter(today).unwrap();

        let history = get_history(user_id, &filter, today, &conn).unwrap();

        assert_eq!(history.count, 3);
        assert_eq!(history.totals.total_income, 1_000);
        assert_eq!(history.totals.total_expense, 250);
        assert_eq!(history.totals.net_flow, 750);
        let labels: Vec<_> = history.groups.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday"]);
        assert_eq!(history.categories.len(), 2);
        assert_eq!(history.accounts.len(), 1);
    }

    #[tokio::test]
    async fn endpoint_responds_with_history() {
        let conn = get_test_connection();
        let user_id = UserId::new(1);
        let food = must_create_category(user_id, "Food", CategoryType::Expense, &conn);
        let bank = insert_account(user_id, "Bank", 0, &conn);
        let today = local_today("Etc/UTC").unwrap();
        insert_test_transaction(user_id, 200, today, food.id, bank.id, &conn);
        let state = TransactionHistoryState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_transaction_history(
            State(state),
            Extension(user_id),
            Query(HistoryQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let history: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(history["count"], 1);
        assert_eq!(history["total_expense"], 200);
        assert_eq!(history["groups"][0]["label"], "Today");
    }
}
