//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    ActionResult, AppState, Error, UserId,
    category::{CategoryFields, CategoryFormData, db::create_category},
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new category, responds with an [ActionResult].
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryEndpointState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let fields = match CategoryFields::parse(&form, Error::MissingCategoryFields) {
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

    match create_category(user_id, &fields, &connection) {
        Ok(category) => {
            tracing::info!("Created category {} for user {user_id}", category.id);
            ActionResult::success().into_response()
        }
        Err(error) => {
            tracing::error!("Could not create category with {form:?}: {error}");
            error.into_response()
        }
    }
}
