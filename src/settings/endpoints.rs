//! Endpoints for reading and updating user settings.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    ActionResult, AppState, Error, UserId,
    amount::parse_optional_integer,
    currency::DEFAULT_CURRENCY,
    settings::db::{
        DEFAULT_START_DAY, Preferences, get_user_settings, save_full_name, save_preferences,
    },
};

/// The state needed for the settings endpoints.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating preferences. Blank fields take their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PreferencesForm {
    #[serde(default)]
    pub currency: String,
    #[serde(default, alias = "budgetLimit")]
    pub budget_limit: String,
    #[serde(default, alias = "startDate", alias = "startDay")]
    pub start_day: String,
}

impl TryFrom<&PreferencesForm> for Preferences {
    type Error = Error;

    fn try_from(form: &PreferencesForm) -> Result<Self, Self::Error> {
        let currency = match form.currency.trim() {
            "" => DEFAULT_CURRENCY.to_owned(),
            currency => currency.to_uppercase(),
        };

        let budget_limit = parse_optional_integer(&form.budget_limit, "budget_limit")?.unwrap_or(0);
        if budget_limit < 0 {
            return Err(Error::NegativeBudgetLimit);
        }

        let start_day = parse_optional_integer(&form.start_day, "start_day")?
            .unwrap_or(DEFAULT_START_DAY as i64);
        if !(1..=28).contains(&start_day) {
            return Err(Error::InvalidStartDay(start_day));
        }

        Ok(Self {
            currency,
            budget_limit,
            start_day: start_day as u8,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default, alias = "fullName")]
    pub full_name: String,
}

/// Route handler for the user's settings.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_user_settings(user_id, &connection) {
        Ok(settings) => Json(settings).into_response(),
        Err(error) => {
            tracing::error!("Could not get settings for user {user_id}: {error}");
            error.into_response()
        }
    }
}

/// Route handler for updating currency, budget limit and start day.
pub async fn update_preferences_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<PreferencesForm>,
) -> Response {
    let preferences = match Preferences::try_from(&form) {
        Ok(preferences) => preferences,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match save_preferences(user_id, &preferences, &connection) {
        Ok(()) => ActionResult::success().into_response(),
        Err(error) => {
            tracing::error!("Could not save preferences for user {user_id}: {error}");
            error.into_response()
        }
    }
}

/// Route handler for updating the user's full name.
pub async fn update_profile_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        return Error::EmptyFullName.into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match save_full_name(user_id, full_name, &connection) {
        Ok(()) => ActionResult::success().into_response(),
        Err(error) => {
            tracing::error!("Could not save profile for user {user_id}: {error}");
            error.into_response()
        }
    }
}
