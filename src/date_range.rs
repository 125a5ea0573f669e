//! Calendar helpers shared by the transaction history and the dashboard.

use serde::Serialize;
use time::{Date, Month, Weekday};

use crate::Error;

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The number of days in the range, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

/// Build a date, reporting dates outside of the supported years as [Error::InvalidDate].
pub fn calendar_date(year: i32, month: Month, day: u8) -> Result<Date, Error> {
    Date::from_calendar_date(year, month, day)
        .map_err(|_| Error::InvalidDate(format!("{year:04}-{:02}-{day:02}", month as u8)))
}

/// The first to the last day of `month`.
pub fn month_bounds(year: i32, month: Month) -> Result<DateRange, Error> {
    Ok(DateRange {
        start: calendar_date(year, month, 1)?,
        end: calendar_date(year, month, last_day_of_month(year, month))?,
    })
}

/// January 1st to December 31st of `year`.
pub fn year_bounds(year: i32) -> Result<DateRange, Error> {
    Ok(DateRange {
        start: calendar_date(year, Month::January, 1)?,
        end: calendar_date(year, Month::December, 31)?,
    })
}

/// The year and month before `month`.
pub fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

/// The year and month after `month`.
pub fn next_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    }
}

pub fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}

pub fn month_abbrev(month: Month) -> &'static str {
    &month_name(month)[..3]
}

pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
