//! Summarizes the user's accounts: net worth, assets, liabilities and how the
//! assets are spread over the account types.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error, UserId,
    account::{Account, AccountType, get_accounts},
    amount::Amount,
};

/// The state needed for the [get_accounts_overview](crate::account::get_accounts_overview) route handler.
#[derive(Debug, Clone)]
pub struct AccountsOverviewState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsOverviewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The accounts of one [AccountType].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountGroup {
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub label: &'static str,
    pub accounts: Vec<Account>,
    /// The sum of the positive balances in the group.
    pub total: Amount,
}

/// The share of the total assets held in one [AccountType].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub label: &'static str,
    pub amount: Amount,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountsOverview {
    pub account_count: usize,
    /// The sum of all balances.
    pub net_worth: Amount,
    /// The sum of non-negative balances.
    pub total_assets: Amount,
    /// The sum of the absolute values of negative balances.
    pub total_liabilities: Amount,
    /// Non-empty groups in the order bank, wallet, cash, investment.
    pub groups: Vec<AccountGroup>,
    /// Groups with a positive total, largest first.
    pub allocation: Vec<Allocation>,
}

impl AccountsOverview {
    /// Build the overview from `accounts`, which should already be ordered by balance.
    pub fn new(accounts: Vec<Account>) -> Self {
        let account_count = accounts.len();
        let net_worth = accounts.iter().map(|account| account.balance).sum();
        let total_assets: Amount = accounts
            .iter()
            .filter(|account| account.balance >= 0)
            .map(|account| account.balance)
            .sum();
        let total_liabilities = accounts
            .iter()
            .filter(|account| account.balance < 0)
            .map(|account| account.balance.abs())
            .sum();

        let mut groups: Vec<AccountGroup> = AccountType::ALL
            .iter()
            .map(|&account_type| AccountGroup {
                account_type,
                label: account_type.label(),
                accounts: Vec::new(),
                total: 0,
            })
            .collect();

        for account in accounts {
            // Every account type has a group.
            let Some(group) = groups
                .iter_mut()
                .find(|group| group.account_type == account.account_type)
            else {
                continue;
            };

            if account.balance > 0 {
                group.total += account.balance;
            }

            group.accounts.push(account);
        }

        groups.retain(|group| !group.accounts.is_empty());

        let mut allocation: Vec<Allocation> = groups
            .iter()
            .filter(|group| group.total > 0)
            .map(|group| Allocation {
                account_type: group.account_type,
                label: group.label,
                amount: group.total,
                percentage: if total_assets > 0 {
                    group.total as f64 / total_assets as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        allocation.sort_by(|a, b| b.amount.cmp(&a.amount));

        Self {
            account_count,
            net_worth,
            total_assets,
            total_liabilities,
            groups,
            allocation,
        }
    }
}

/// Route handler for the accounts overview.
pub async fn get_accounts_overview(
    State(state): State<AccountsOverviewState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_accounts(user_id, &connection) {
        Ok(accounts) => Json(AccountsOverview::new(accounts)).into_response(),
        Err(error) => {
            tracing::error!("Could not get accounts for user {user_id}: {error}");
            error.into_response()
        }
    }
}
