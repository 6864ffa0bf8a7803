//! Day-weighted sums over monthly projections.
//!
//! A window of N days consumes whole months in calendar order and prorates
//! the month where it ends by the share of that month's days it covers.

use crate::schema::MonthlyRow;
use crate::utils::{days_in_month_of, finite_or_zero, parse_month_start};
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMonth {
    pub month_start: NaiveDate,
    /// Whole currency units, not compacted.
    pub value: f64,
    pub days: u32,
}

/// Future rows with parseable dates, one per calendar month, sorted
/// chronologically. A month listed twice keeps its last row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionWindow {
    months: Vec<ProjectedMonth>,
    /// Values of rows whose `month_start` could not be read.
    undated_total: f64,
}

impl ProjectionWindow {
    pub fn from_rows(rows: &[MonthlyRow]) -> Self {
        let mut by_month: BTreeMap<NaiveDate, ProjectedMonth> = BTreeMap::new();
        let mut undated_total = 0.0;

        for row in rows {
            let raw = row.month_start.as_deref().unwrap_or("");
            let month_start = match parse_month_start(raw) {
                Ok(month_start) => month_start,
                Err(e) => {
                    debug!("Skipping projected row: {}", e);
                    undated_total += row.value_or_zero();
                    continue;
                }
            };

            let month = ProjectedMonth {
                month_start,
                value: row.value_or_zero(),
                days: days_in_month_of(month_start),
            };
            if by_month.insert(month_start, month).is_some() {
                debug!(
                    "Duplicate projected row for {}; keeping the later value",
                    month_start
                );
            }
        }

        Self {
            months: by_month.into_values().collect(),
            undated_total,
        }
    }

    pub fn months(&self) -> &[ProjectedMonth] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Sum of the first `target_days` days of projection. Runs out of rows
    /// without extrapolating.
    pub fn sum_days(&self, target_days: i64) -> f64 {
        let mut remaining = target_days.max(0);
        let mut total = 0.0;

        for month in &self.months {
            if remaining <= 0 {
                break;
            }
            if month.days == 0 {
                continue;
            }

            let days = i64::from(month.days);
            let take = remaining.min(days);
            total += month.value * (take as f64 / days as f64);
            remaining -= take;
        }

        finite_or_zero(total)
    }

    /// Every dated month plus rows without a readable date.
    pub fn total(&self) -> f64 {
        let dated: f64 = self.months.iter().map(|m| m.value).sum();
        finite_or_zero(dated + self.undated_total)
    }

    /// Sum of months starting in `year`.
    pub fn total_in_year(&self, year: i32) -> f64 {
        let total: f64 = self
            .months
            .iter()
            .filter(|m| m.month_start.year() == year)
            .map(|m| m.value)
            .sum();
        finite_or_zero(total)
    }
}

pub fn sum_projected_days(rows: &[MonthlyRow], target_days: i64) -> f64 {
    ProjectionWindow::from_rows(rows).sum_days(target_days)
}
