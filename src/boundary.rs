use crate::utils::{days_in_month_of, finite_or_zero};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Where "today" sits on the chart, in bucket-index units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPoint {
    /// Index of the last past-actual bucket (the current month).
    pub split_base_index: usize,
    /// Index in the concatenated sequence where projections begin.
    pub first_future_index: usize,
    /// Elapsed share of the current month, in `[0, 1]`.
    pub offset_fraction: f64,
    /// `split_base_index + offset_fraction`.
    pub x: f64,
    /// Held flat from the last actual value; there is no intra-month actual data.
    pub value: f64,
}

/// `(day_of_month - 1) / days_in_month`, clamped to `[0, 1]`.
pub fn split_offset_fraction(now: NaiveDate) -> f64 {
    let days = days_in_month_of(now);
    if days == 0 {
        return 0.0;
    }
    let fraction = (now.day() as f64 - 1.0) / days as f64;
    finite_or_zero(fraction).clamp(0.0, 1.0)
}

pub fn interpolate_boundary(
    now: NaiveDate,
    split_base_index: usize,
    last_past_value: f64,
) -> SplitPoint {
    let offset_fraction = split_offset_fraction(now);
    SplitPoint {
        split_base_index,
        first_future_index: split_base_index + 1,
        offset_fraction,
        x: split_base_index as f64 + offset_fraction,
        value: finite_or_zero(last_past_value),
    }
}
