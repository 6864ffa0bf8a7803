use crate::calendar::MonthKey;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(next)) => next.signed_duration_since(start).num_days() as u32,
        _ => 0,
    }
}

pub fn days_in_month_of(date: NaiveDate) -> u32 {
    days_in_month(date.year(), date.month())
}

/// Parses a `month_start` field into the first day of its month.
///
/// Only the `YYYY-MM` prefix is read, the same way chart buckets are keyed,
/// so `2026-03-17`, `2026-03` and ISO timestamps all land on March.
pub fn parse_month_start(raw: &str) -> Result<NaiveDate> {
    let key: MonthKey = raw.parse().map_err(|_| {
        ForecastError::DateError(format!(
            "Invalid month_start '{}'. Expected YYYY-MM-DD or YYYY-MM",
            raw
        ))
    })?;

    key.first_day().ok_or_else(|| {
        ForecastError::DateError(format!("Cannot normalize '{}' to a month start", raw))
    })
}

/// Replaces NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
