//! Transactions record money coming into or going out of an account.
//!
//! This module contains:
//! - The `Transaction` model and its database functions
//! - The balance rule that keeps account balances in step with transactions
//! - The create, edit, delete and duplicate actions
//! - The transaction history with its filters and day groups

mod balance;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod duplicate_endpoint;
mod edit_endpoint;
mod form;
mod grouping;
mod history;
mod query;

pub use self::core::{Transaction, TransactionFields, TransactionId, create_transaction_table};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use duplicate_endpoint::duplicate_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use history::get_transaction_history;
pub use query::{HistoryFilter, SortOrder, TransactionRow, query_transactions};

#[cfg(test)]
pub use self::core::test_utils;
