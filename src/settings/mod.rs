//! User preferences (currency, monthly budget, period start day) and profile.

mod db;
mod endpoints;

pub use db::{UserSettings, create_user_settings_table, get_user_settings};
pub use endpoints::{get_settings_endpoint, update_preferences_endpoint, update_profile_endpoint};

#[cfg(test)]
pub use db::{Preferences, save_preferences};
