//! Accounts hold money and track a running balance.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod overview;

pub use self::core::{
    Account, AccountId, AccountType, adjust_account_balance, create_account_table, get_account,
    get_accounts, get_total_account_balance, map_row_to_account,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use overview::get_accounts_overview;

#[cfg(test)]
pub use self::core::test_utils;
