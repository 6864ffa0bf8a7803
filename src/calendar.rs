//! Calendar-month keys for the trailing and leading chart windows.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonthKey(format!(
                "{:04}-{:02}: month must be between 1 and 12",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The key `delta` months away (negative moves backwards).
    pub fn offset(&self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// `"{short month} '{2-digit year}"`, e.g. `Oct '26`.
    pub fn label(&self) -> String {
        format!(
            "{} '{:02}",
            SHORT_MONTHS[(self.month - 1) as usize],
            self.year.rem_euclid(100)
        )
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ForecastError;

    /// Reads the `YYYY-MM` prefix of a key or date string.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let prefix = trimmed
            .get(..7)
            .ok_or_else(|| ForecastError::InvalidMonthKey(s.to_string()))?;

        let (year, month) = prefix
            .split_once('-')
            .ok_or_else(|| ForecastError::InvalidMonthKey(s.to_string()))?;

        if year.len() != 4 || month.len() != 2 {
            return Err(ForecastError::InvalidMonthKey(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| ForecastError::InvalidMonthKey(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| ForecastError::InvalidMonthKey(s.to_string()))?;

        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One x-axis slot of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub label: String,
}

impl From<MonthKey> for MonthBucket {
    fn from(key: MonthKey) -> Self {
        Self {
            label: key.label(),
            key,
        }
    }
}

/// `n` keys ending at the month containing `now` inclusive, oldest first.
pub fn trailing_keys(now: NaiveDate, n: usize) -> Vec<MonthKey> {
    let current = MonthKey::of(now);
    (0..n as i32)
        .rev()
        .map(|back| current.offset(-back))
        .collect()
}

/// `n` keys strictly after the month containing `now`, oldest first.
pub fn leading_keys(now: NaiveDate, n: usize) -> Vec<MonthKey> {
    let current = MonthKey::of(now);
    (1..=n as i32).map(|ahead| current.offset(ahead)).collect()
}

pub fn label(key: &MonthKey) -> String {
    key.label()
}
