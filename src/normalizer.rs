use crate::calendar::MonthKey;
use crate::schema::{ConfidenceBand, MonthlyRow};
use crate::utils::finite_or_zero;
use log::{debug, warn};
use std::collections::HashMap;

/// Chart values are expressed in thousands of currency units.
pub const COMPACT_UNIT_DIVISOR: f64 = 1000.0;

pub fn to_compact_units(value: f64) -> f64 {
    (finite_or_zero(value) / COMPACT_UNIT_DIVISOR).round()
}

fn row_key(row: &MonthlyRow) -> Option<MonthKey> {
    let raw = row.month_start.as_deref()?;
    match raw.parse::<MonthKey>() {
        Ok(key) => Some(key),
        Err(e) => {
            debug!("Skipping row with unparseable month_start: {}", e);
            None
        }
    }
}

/// Raw values per target month, in target order. Absent months are zero and
/// duplicate months keep the last row seen.
pub fn bucket_values(rows: &[MonthlyRow], keys: &[MonthKey]) -> Vec<f64> {
    let mut by_month: HashMap<MonthKey, f64> = HashMap::with_capacity(rows.len());

    for row in rows {
        let Some(key) = row_key(row) else { continue };
        if by_month.insert(key, row.value_or_zero()).is_some() {
            debug!("Duplicate row for month {}; keeping the later value", key);
        }
    }

    keys.iter()
        .map(|key| by_month.get(key).copied().unwrap_or(0.0))
        .collect()
}

/// Bucketed values rescaled to compact units (thousands, rounded).
pub fn normalize(rows: &[MonthlyRow], keys: &[MonthKey]) -> Vec<f64> {
    bucket_values(rows, keys)
        .into_iter()
        .map(to_compact_units)
        .collect()
}

/// Places per-month confidence tags onto the target months.
///
/// Tags are paired with rows by position as received, then moved along with
/// their row to its calendar slot. Slots with no paired tag use `fallback`.
pub fn align_bands(
    rows: &[MonthlyRow],
    bands: &[Option<ConfidenceBand>],
    keys: &[MonthKey],
    fallback: Option<ConfidenceBand>,
) -> Vec<Option<ConfidenceBand>> {
    if !bands.is_empty() && bands.len() != rows.len() {
        warn!(
            "confidence_band_by_month has {} entries for {} projected rows; unmatched months use the overall band",
            bands.len(),
            rows.len()
        );
    }

    let row_keys: Vec<Option<MonthKey>> = rows.iter().map(row_key).collect();

    let parsed: Vec<MonthKey> = row_keys.iter().flatten().copied().collect();
    if parsed.windows(2).any(|pair| pair[0] > pair[1]) {
        warn!("future_projected_12m is not in calendar order; re-aligning bands by month");
    }

    let mut by_month: HashMap<MonthKey, ConfidenceBand> = HashMap::new();
    for (key, band) in row_keys.iter().zip(bands.iter()) {
        if let (Some(key), Some(band)) = (key, band) {
            by_month.insert(*key, *band);
        }
    }

    keys.iter()
        .map(|key| by_month.get(key).copied().or(fallback))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{leading_keys, trailing_keys};
    use chrono::NaiveDate;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_normalize_ignores_input_order_and_gaps() {
        let rows = vec![
            MonthlyRow::new("2026-10-01", 41_600.0),
            MonthlyRow::new("2026-06-01", 12_400.0),
            MonthlyRow::new("2026-08-01", 8_499.0),
        ];
        let keys = trailing_keys(now(), 6);

        let values = normalize(&rows, &keys);
        assert_eq!(values, vec![0.0, 12.0, 0.0, 8.0, 0.0, 42.0]);
    }

    #[test]
    fn test_duplicate_month_last_wins() {
        let rows = vec![
            MonthlyRow::new("2026-11-01", 10_000.0),
            MonthlyRow::new("2026-11-15", 20_000.0),
        ];
        let keys = leading_keys(now(), 12);

        let values = bucket_values(&rows, &keys);
        assert_eq!(values.len(), 12);
        assert_eq!(values[0], 20_000.0);
        assert!(values[1..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_bad_rows_are_zero() {
        let rows = vec![
            MonthlyRow::new("not-a-date", 99_000.0),
            MonthlyRow {
                month_start: None,
                value: Some(5_000.0),
            },
            MonthlyRow {
                month_start: Some("2026-09-01".to_string()),
                value: Some(f64::INFINITY),
            },
        ];
        let values = normalize(&rows, &trailing_keys(now(), 6));
        assert!(values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_compact_units_round_half_away() {
        assert_eq!(to_compact_units(1_499.0), 1.0);
        assert_eq!(to_compact_units(1_500.0), 2.0);
        assert_eq!(to_compact_units(f64::NAN), 0.0);
    }

    #[test]
    fn test_align_bands_follows_rows() {
        let rows = vec![
            MonthlyRow::new("2026-12-01", 1.0),
            MonthlyRow::new("2026-11-01", 1.0),
        ];
        let bands = vec![Some(ConfidenceBand::Red), Some(ConfidenceBand::Green)];
        let keys = leading_keys(now(), 3);

        let aligned = align_bands(&rows, &bands, &keys, None);
        assert_eq!(
            aligned,
            vec![Some(ConfidenceBand::Green), Some(ConfidenceBand::Red), None]
        );
    }

    #[test]
    fn test_align_bands_fallback() {
        let rows = vec![MonthlyRow::new("2026-11-01", 1.0)];
        let keys = leading_keys(now(), 2);

        let aligned = align_bands(&rows, &[], &keys, Some(ConfidenceBand::Yellow));
        assert_eq!(
            aligned,
            vec![Some(ConfidenceBand::Yellow), Some(ConfidenceBand::Yellow)]
        );
    }
}
