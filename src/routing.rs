//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_accounts_overview,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, edit_category_endpoint,
        get_category_list,
    },
    dashboard::get_dashboard,
    endpoints,
    not_found::get_404_not_found,
    settings::{get_settings_endpoint, update_preferences_endpoint, update_profile_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, duplicate_transaction_endpoint,
        edit_transaction_endpoint, get_transaction_history,
    },
    user::require_user,
};

/// Return a router with all the app's routes.
///
/// Every route requires the user ID header set by the authentication proxy.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route(
            endpoints::ACCOUNTS,
            get(get_accounts_overview).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            put(edit_account_endpoint).delete(delete_account_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_category_list).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(edit_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transaction_history).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::DUPLICATE_TRANSACTION,
            post(duplicate_transaction_endpoint),
        )
        .route(endpoints::SETTINGS, get(get_settings_endpoint))
        .route(endpoints::PREFERENCES, put(update_preferences_endpoint))
        .route(endpoints::PROFILE, put(update_profile_endpoint))
        .layer(middleware::from_fn(require_user))
        .fallback(get_404_not_found)
        .with_state(state)
}
