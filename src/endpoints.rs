//! The API endpoints URIs.

/// The route for the dashboard of a financial period.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to update or delete an account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route for the transaction history and creating transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to copy a transaction to today.
pub const DUPLICATE_TRANSACTION: &str = "/api/transactions/{transaction_id}/duplicate";
/// The route to get the user's settings.
pub const SETTINGS: &str = "/api/settings";
/// The route to update the currency, budget limit and period start day.
pub const PREFERENCES: &str = "/api/settings/preferences";
/// The route to update the user's full name.
pub const PROFILE: &str = "/api/settings/profile";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
