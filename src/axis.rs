//! Y-axis domain for the forecast chart.
//!
//! The domain is padded around the data, widened to at least
//! [`MIN_SPAN`] units, and only then snapped outward to multiples of
//! [`ROUNDING_STEP`]. Rounding last keeps the minimum span intact.

use serde::Serialize;

pub const MIN_SPAN: f64 = 20.0;
pub const ROUNDING_STEP: f64 = 5.0;
pub const TICK_COUNT: usize = 5;

const DEFAULT_MIN: f64 = 0.0;
const DEFAULT_MAX: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    /// Top tick first, bottom tick last.
    pub y_ticks: [f64; TICK_COUNT],
    /// Distance between adjacent ticks.
    pub step: f64,
}

impl AxisRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Computes the axis range for a set of compact-unit values. Non-finite
/// entries are ignored.
pub fn compute_axis_range(values: &[f64]) -> AxisRange {
    let (raw_min, raw_max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .unwrap_or((DEFAULT_MIN, DEFAULT_MAX));

    let span = (raw_max - raw_min).max(0.0);
    let padding = if span > 0.0 {
        (span * 0.2).max(8.0)
    } else {
        (raw_max * 0.35).max(10.0)
    };

    let mut min = (raw_min - padding).max(0.0);
    let mut max = raw_max + padding;

    if max - min < MIN_SPAN {
        let center = (max + min) / 2.0;
        min = (center - MIN_SPAN / 2.0).max(0.0);
        max = min + MIN_SPAN;
    }

    if max <= min {
        min = DEFAULT_MIN;
        max = DEFAULT_MAX;
    }

    min = (min / ROUNDING_STEP).floor() * ROUNDING_STEP;
    max = (max / ROUNDING_STEP).ceil() * ROUNDING_STEP;
    if max <= min {
        max = min + ROUNDING_STEP;
    }

    let step = (max - min) / (TICK_COUNT - 1) as f64;
    let mut y_ticks = [0.0; TICK_COUNT];
    for (i, tick) in y_ticks.iter_mut().enumerate() {
        *tick = (max - i as f64 * step).round();
    }

    AxisRange {
        min,
        max,
        y_ticks,
        step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(values: &[f64], range: &AxisRange) {
        assert!(range.span() >= MIN_SPAN, "span too small: {:?}", range);
        assert_eq!(range.min % ROUNDING_STEP, 0.0);
        assert_eq!(range.max % ROUNDING_STEP, 0.0);
        assert!(range.min >= 0.0);
        for v in values.iter().filter(|v| v.is_finite()) {
            assert!(range.contains(*v), "{} outside {:?}", v, range);
        }
    }

    #[test]
    fn test_all_zero_series() {
        let values = vec![0.0; 18];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 20.0);
        assert_eq!(range.y_ticks, [20.0, 15.0, 10.0, 5.0, 0.0]);
        assert_eq!(range.step, 5.0);
    }

    #[test]
    fn test_empty_series_uses_default_domain() {
        // rawMin=0, rawMax=120, span=120, padding=24
        let range = compute_axis_range(&[]);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 145.0);
        assert_invariants(&[], &range);
    }

    #[test]
    fn test_padding_and_rounding() {
        // span=40 -> padding=8 -> [42, 98] -> [40, 100]
        let values = vec![50.0, 62.0, 90.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 40.0);
        assert_eq!(range.max, 100.0);
        assert_eq!(range.y_ticks, [100.0, 85.0, 70.0, 55.0, 40.0]);
        assert_invariants(&values, &range);
    }

    #[test]
    fn test_single_value_series() {
        // padding = max(10, 200*0.35) = 70 -> [130, 270]
        let values = vec![200.0, 200.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 130.0);
        assert_eq!(range.max, 270.0);
        assert_invariants(&values, &range);
    }

    #[test]
    fn test_narrow_high_series_recenters() {
        // span=2 -> padding=8 -> [93, 111] (18 wide) -> recenter [92, 112] -> [90, 115]
        let values = vec![101.0, 103.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 90.0);
        assert_eq!(range.max, 115.0);
        assert_invariants(&values, &range);
    }

    #[test]
    fn test_non_finite_ignored() {
        let values = vec![f64::NAN, 30.0, f64::INFINITY, 10.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 40.0);
        assert_invariants(&values, &range);
    }

    #[test]
    fn test_uneven_ticks_round() {
        // span=6 -> padding=8 -> [0, 19] -> recenter [0, 20] -> step 5
        let values = vec![5.0, 11.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 20.0);

        // span=100 -> padding=20 -> [0, 125] -> step 31.25
        let values = vec![5.0, 105.0];
        let range = compute_axis_range(&values);
        assert_eq!(range.max, 125.0);
        assert_eq!(range.step, 31.25);
        assert_eq!(range.y_ticks, [125.0, 94.0, 63.0, 31.0, 0.0]);
    }
}
