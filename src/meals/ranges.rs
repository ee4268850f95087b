//! Boundary-date arithmetic for the daily/weekly/monthly range queries.
//! All ranges are inclusive on both ends and expressed in UTC.

use time::format_description::FormatItem;
use time::macros::{format_description, time};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::MealError;

const DATE_FMT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Result<Date, MealError> {
    Date::parse(s, DATE_FMT).map_err(|e| MealError::InvalidDate(format!("{s:?}: {e}")))
}

/// `[00:00:00, 23:59:59.999999]` of the given calendar day.
pub fn day_range(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    (
        date.midnight().assume_utc(),
        date.with_time(time!(23:59:59.999999)).assume_utc(),
    )
}

/// The ISO week containing `date`: Monday 00:00:00 through Sunday
/// 23:59:59.999999.
pub fn week_range(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let monday = date - Duration::days(i64::from(date.weekday().number_days_from_monday()));
    let sunday = monday + Duration::days(6);
    (
        monday.midnight().assume_utc(),
        sunday.with_time(time!(23:59:59.999999)).assume_utc(),
    )
}

/// Day 1 00:00:00 through the actual last day of the month 23:59:59,
/// leap-year aware.
pub fn month_range(year: i32, month: u8) -> Result<(OffsetDateTime, OffsetDateTime), MealError> {
    let month = Month::try_from(month).map_err(|e| MealError::InvalidDate(e.to_string()))?;
    let first = Date::from_calendar_date(year, month, 1)
        .map_err(|e| MealError::InvalidDate(e.to_string()))?;
    let last = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .map_err(|e| MealError::InvalidDate(e.to_string()))?;
    Ok((
        first.midnight().assume_utc(),
        last.with_time(time!(23:59:59)).assume_utc(),
    ))
}
