//! Category editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    ActionResult, AppState, Error, UserId,
    category::{CategoryFields, CategoryFormData, CategoryId, db::update_category},
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Update a category's name, type and color.
///
/// Changing the type does not touch account balances: the effect of existing
/// transactions was settled when they were recorded.
pub async fn edit_category_endpoint(
    State(state): State<EditCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let fields = match CategoryFields::parse(&form, Error::MissingCategoryUpdateFields) {
        Ok(fields) => fields,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_category(category_id, user_id, &fields, &connection) {
        Ok(()) => ActionResult::success().into_response(),
        Err(Error::UpdateMissingCategory) => Error::UpdateMissingCategory.into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_response()
        }
    }
}
