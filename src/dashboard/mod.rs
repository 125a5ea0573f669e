//! The dashboard: how the current financial period is going.
//!
//! A financial period runs from the user's start day to the day before the
//! start day of the following month.

mod aggregation;
mod handlers;
mod insight;
mod period;
mod summary;

pub use handlers::get_dashboard;
