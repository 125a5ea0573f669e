//! Financial periods: month-long windows starting on the user's start day.

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    date_range::{DateRange, calendar_date, month_name, next_month, previous_month},
};

/// A month-long window from the user's start day to the day before the next
/// start day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialPeriod {
    #[serde(flatten)]
    pub range: DateRange,
    /// The month and year the period starts in, e.g. "October 2025".
    pub label: String,
    /// The `month` parameter of the previous period, e.g. "2025-09".
    pub prev_month: String,
    /// The `month` parameter of the next period, e.g. "2025-11".
    pub next_month: String,
}

impl FinancialPeriod {
    /// The period that `date` falls in.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the period does not fit into the supported years,
    /// or if `start_day` is not between 1 and 28.
    pub fn containing(date: Date, start_day: u8) -> Result<Self, Error> {
        if date.day() >= start_day {
            Self::starting_in(date.year(), date.month(), start_day)
        } else {
            let (year, month) = previous_month(date.year(), date.month());
            Self::starting_in(year, month, start_day)
        }
    }

    /// The period that starts in `month` of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the period or its neighbours do not fit
    /// into the supported years, or if `start_day` is not between 1 and 28.
    pub fn starting_in(year: i32, month: Month, start_day: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(month_param(year, month));

        if !(1..=28).contains(&start_day) {
            return Err(invalid());
        }

        let start = calendar_date(year, month, start_day).map_err(|_| invalid())?;
        let (next_year, next) = next_month(year, month);
        let end = calendar_date(next_year, next, start_day)
            .ok()
            .and_then(|next_start| next_start.previous_day())
            .ok_or_else(invalid)?;
        let (prev_year, prev) = previous_month(year, month);

        Ok(Self {
            range: DateRange { start, end },
            label: format!("{} {year}", month_name(month)),
            prev_month: month_param(prev_year, prev),
            next_month: month_param(next_year, next),
        })
    }
}

fn month_param(year: i32, month: Month) -> String {
    format!("{year:04}-{:02}", month as u8)
}

/// Parse a `month` parameter formatted as YYYY-MM.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `text` is not a valid year and month.
pub fn parse_month_param(text: &str) -> Result<(i32, Month), Error> {
    let invalid = || Error::InvalidMonth(text.to_owned());

    let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;

    if !(1..=9999).contains(&year) {
        return Err(invalid());
    }

    Ok((year, month))
}
