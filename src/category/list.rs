//! Lists the user's categories split by type.

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
    category::{Category, CategoryType, db::get_all_categories},
};

/// The state needed for the category list.
#[derive(Debug, Clone)]
pub struct CategoryListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A category together with whether it can be deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListItem {
    #[serde(flatten)]
    pub category: Category,
    pub is_system: bool,
}

/// The user's categories ordered by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryList {
    pub count: usize,
    pub income: Vec<CategoryListItem>,
    pub expense: Vec<CategoryListItem>,
}

impl CategoryList {
    /// Split `categories`, which should already be sorted by name, by type.
    pub fn new(categories: Vec<Category>) -> Self {
        let count = categories.len();
        let (income, expense): (Vec<_>, Vec<_>) = categories
            .into_iter()
            .map(|category| CategoryListItem {
                is_system: category.is_system(),
                category,
            })
            .partition(|item| item.category.category_type == CategoryType::Income);

        Self {
            count,
            income,
            expense,
        }
    }
}

/// Route handler for the category list.
pub async fn get_category_list(
    State(state): State<CategoryListState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_categories(user_id, &connection) {
        Ok(categories) => Json(CategoryList::new(categories)).into_response(),
        Err(error) => {
            tracing::error!("Could not get categories for user {user_id}: {error}");
            error.into_response()
        }
    }
}
