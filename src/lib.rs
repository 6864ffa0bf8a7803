//! # GCI Forecast
//!
//! Turns a forecasting payload (sparse monthly actual and projected Gross
//! Commission Income, plus headline scalar fields) into what the dashboard
//! renders: a calendar-aligned chart series and a set of headline metrics.
//!
//! ## Core Concepts
//!
//! - **Month buckets**: 6 trailing months ending with the current month, then 12 leading months
//! - **Compact units**: chart values are thousands of currency units, rounded
//! - **Split point**: where today falls inside the current month, used to hand over from actual to projected
//! - **Day-weighted windows**: 60/180/365-day projections prorate the month a window ends in
//! - **Fallback chains**: each headline metric reads the first usable upstream field
//!
//! Derivation is pure and infallible. Bad or missing fields degrade the one
//! affected number to zero; nothing here returns an error for bad data.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gci_forecast::*;
//! use chrono::NaiveDate;
//!
//! let payload = DashboardPayload::from_json_str(r#"{
//!     "actuals": { "actual_gci_ytd": 120000 },
//!     "projection": { "pc_next_365": 300000 },
//!     "past_actual_6m": [{ "month_start": "2026-10-01", "value": 18000 }],
//!     "future_projected_12m": [{ "month_start": "2026-11-01", "value": 30000 }]
//! }"#).unwrap();
//!
//! let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
//! let DashboardDerivation { chart, metrics } = derive(&payload, now);
//! assert_eq!(chart.past_actual[5], 18.0);
//! assert_eq!(metrics.progress_pct, 40.0);
//! ```

pub mod aggregation;
pub mod axis;
pub mod boundary;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod error;
pub mod fallback;
pub mod format;
pub mod metrics;
pub mod normalizer;
pub mod refresh;
pub mod schema;
pub mod utils;

pub use aggregation::{sum_projected_days, ProjectedMonth, ProjectionWindow};
pub use axis::{compute_axis_range, AxisRange};
pub use boundary::{interpolate_boundary, split_offset_fraction, SplitPoint};
pub use calendar::{leading_keys, trailing_keys, MonthBucket, MonthKey};
pub use chart::{
    build_chart_series, ChartLayout, ChartSeries, LEADING_MONTHS, TRAILING_MONTHS,
};
pub use config::{DashboardConfig, RefreshConfig};
pub use error::{ForecastError, Result};
pub use fallback::{Accept, FallbackChain, Resolved};
pub use format::{
    format_compact_thousands, format_currency, format_percent, metric_cards, MetricCard,
};
pub use metrics::{derive_metrics, CardMetrics};
pub use normalizer::{align_bands, bucket_values, normalize, to_compact_units};
pub use refresh::{
    ConfidenceRefresher, ConfidenceSource, ConfidenceUpdate, PayloadHandle, RefreshEvent,
    RefreshOutcome, RefreshState, RefreshTask, RefreshTrigger,
};
pub use schema::*;

#[cfg(feature = "http")]
pub use refresh::HttpConfidenceSource;

use chrono::{Local, NaiveDate};
use log::debug;
use serde::Serialize;

/// Everything the dashboard renders for one payload at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardDerivation {
    pub chart: ChartSeries,
    pub metrics: CardMetrics,
}

#[derive(Default)]
pub struct DashboardProcessor {
    config: DashboardConfig,
}

impl DashboardProcessor {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn derive(&self, payload: &DashboardPayload, now: NaiveDate) -> DashboardDerivation {
        derive_with_layout(payload, now, &self.config.layout)
    }

    /// Derives against the local calendar date.
    pub fn derive_today(&self, payload: &DashboardPayload) -> DashboardDerivation {
        self.derive(payload, Local::now().date_naive())
    }

    pub fn cards(&self, payload: &DashboardPayload, now: NaiveDate) -> Vec<MetricCard> {
        metric_cards(&derive_metrics(payload, now))
    }
}

pub fn derive(payload: &DashboardPayload, now: NaiveDate) -> DashboardDerivation {
    derive_with_layout(payload, now, &ChartLayout::default())
}

pub fn derive_with_layout(
    payload: &DashboardPayload,
    now: NaiveDate,
    layout: &ChartLayout,
) -> DashboardDerivation {
    debug!(
        "Deriving dashboard for {} with {} past and {} projected rows",
        now,
        payload.past_actual_6m.len(),
        payload.future_projected_12m.len()
    );

    DashboardDerivation {
        chart: build_chart_series(payload, now, layout),
        metrics: derive_metrics(payload, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> DashboardPayload {
        DashboardPayload::from_json_str(
            r#"{
                "actuals": { "actual_gci": 260000, "actual_gci_ytd": 120000 },
                "projection": { "pc_next_365": 300000, "pc_90d": 70000 },
                "confidence": { "score": 0.71, "band": "yellow" },
                "past_actual_6m": [
                    { "month_start": "2026-10-01", "value": 18000 },
                    { "month_start": "2026-05-01", "value": 22000 }
                ],
                "future_projected_12m": [
                    { "month_start": "2026-11-01", "value": 30000 },
                    { "month_start": "2026-12-01", "value": 31000 }
                ],
                "confidence_band_by_month": ["green", "red"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_derivation() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let derived = derive(&sample_payload(), now);

        assert_eq!(derived.chart.past_actual, vec![22.0, 0.0, 0.0, 0.0, 0.0, 18.0]);
        assert_eq!(derived.chart.future_projected[..2], [30.0, 31.0]);
        assert_eq!(derived.chart.future_bands[0], Some(ConfidenceBand::Green));
        assert_eq!(derived.chart.future_bands[1], Some(ConfidenceBand::Red));
        assert_eq!(derived.chart.future_bands[2], Some(ConfidenceBand::Yellow));

        assert_eq!(derived.metrics.actual_last_365, 260_000.0);
        assert_eq!(derived.metrics.actual_ytd, 120_000.0);
        assert_eq!(derived.metrics.projected_next_365, 300_000.0);
        assert_eq!(derived.metrics.progress_pct, 40.0);
        assert_eq!(derived.metrics.projected_ytd, 181_000.0);
    }

    #[test]
    fn test_processor_uses_layout() {
        let mut config = DashboardConfig::default();
        config.layout.point_spacing = 10.0;
        let processor = DashboardProcessor::new(config).unwrap();

        let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let derived = processor.derive(&sample_payload(), now);
        assert_eq!(derived.chart.data_width, 170.0);
        assert_eq!(processor.cards(&sample_payload(), now).len(), 7);
    }

    #[test]
    fn test_processor_rejects_bad_config() {
        let mut config = DashboardConfig::default();
        config.refresh.interval_secs = 0;
        assert!(DashboardProcessor::new(config).is_err());
    }

    #[test]
    fn test_derive_today_shapes() {
        let derived = DashboardProcessor::default().derive_today(&sample_payload());
        assert_eq!(derived.chart.labels.len(), TRAILING_MONTHS + LEADING_MONTHS);
        assert!((0.0..=1.0).contains(&derived.chart.split_offset_fraction));
    }
}
