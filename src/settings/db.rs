//! Storage for user preferences and profile data.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

use crate::{Error, UserId, amount::Amount, currency::DEFAULT_CURRENCY};

/// The day financial periods start on when the user has not picked one.
pub const DEFAULT_START_DAY: u8 = 1;

/// A user's preferences and profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSettings {
    pub user_id: UserId,
    pub full_name: Option<String>,
    /// An ISO 4217 currency code, e.g. "IDR".
    pub currency: String,
    /// The monthly spending budget, zero when no budget is set.
    pub budget_limit: Amount,
    /// The day of the month that financial periods start on, 1 to 28.
    pub start_day: u8,
}

impl UserSettings {
    /// The settings of a user who has not saved any.
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            full_name: None,
            currency: DEFAULT_CURRENCY.to_owned(),
            budget_limit: 0,
            start_day: DEFAULT_START_DAY,
        }
    }
}

/// The validated fields of the preferences form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub currency: String,
    pub budget_limit: Amount,
    pub start_day: u8,
}

pub fn create_user_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
            user_id INTEGER PRIMARY KEY,
            full_name TEXT,
            currency TEXT NOT NULL DEFAULT 'IDR',
            budget_limit INTEGER NOT NULL DEFAULT 0,
            start_day INTEGER NOT NULL DEFAULT 1 CHECK (start_day BETWEEN 1 AND 28)
        )",
        (),
    )?;

    Ok(())
}

/// Get the user's settings, or the defaults if they have never saved any.
pub fn get_user_settings(user_id: UserId, connection: &Connection) -> Result<UserSettings, Error> {
    let settings = connection
        .query_row(
            "SELECT user_id, full_name, currency, budget_limit, start_day
            FROM user_settings WHERE user_id = ?1",
            params![user_id],
            map_row,
        )
        .optional()?;

    Ok(settings.unwrap_or_else(|| UserSettings::default_for(user_id)))
}

/// Save the user's preferences, keeping their profile.
pub fn save_preferences(
    user_id: UserId,
    preferences: &Preferences,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user_settings (user_id, currency, budget_limit, start_day)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id) DO UPDATE SET
            currency = excluded.currency,
            budget_limit = excluded.budget_limit,
            start_day = excluded.start_day",
        params![
            user_id,
            preferences.currency,
            preferences.budget_limit,
            preferences.start_day
        ],
    )?;

    Ok(())
}

/// Save the user's full name, keeping their preferences.
pub fn save_full_name(user_id: UserId, full_name: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user_settings (user_id, full_name) VALUES (?1, ?2)
        ON CONFLICT(user_id) DO UPDATE SET full_name = excluded.full_name",
        params![user_id, full_name],
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<UserSettings, rusqlite::Error> {
    Ok(UserSettings {
        user_id: row.get(0)?,
        full_name: row.get(1)?,
        currency: row.get(2)?,
        budget_limit: row.get(3)?,
        start_day: row.get(4)?,
    })
}
