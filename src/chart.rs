use crate::axis::{compute_axis_range, TICK_COUNT};
use crate::boundary::interpolate_boundary;
use crate::calendar::{leading_keys, trailing_keys, MonthBucket};
use crate::normalizer::{align_bands, normalize};
use crate::schema::{ConfidenceBand, DashboardPayload};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TRAILING_MONTHS: usize = 6;
pub const LEADING_MONTHS: usize = 12;

/// Horizontal geometry of the chart, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    /// Distance between adjacent month buckets.
    pub point_spacing: f64,
    pub y_axis_width: f64,
    pub trailing_padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            point_spacing: 56.0,
            y_axis_width: 44.0,
            trailing_padding: 16.0,
        }
    }
}

impl ChartLayout {
    pub fn data_width(&self, bucket_count: usize) -> f64 {
        bucket_count.saturating_sub(1) as f64 * self.point_spacing
    }

    pub fn chart_width(&self, bucket_count: usize) -> f64 {
        self.data_width(bucket_count) + self.y_axis_width + self.trailing_padding
    }
}

/// Render-ready series: six actual months through the current one, then
/// twelve projected months. Values are in thousands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub buckets: Vec<MonthBucket>,
    pub labels: Vec<String>,
    pub past_actual: Vec<f64>,
    pub future_projected: Vec<f64>,
    pub future_bands: Vec<Option<ConfidenceBand>>,
    /// Label index of the month containing today.
    pub boundary_index: usize,
    pub split_base_index: usize,
    pub first_future_index: usize,
    pub split_offset_fraction: f64,
    pub split_x: f64,
    pub split_value: f64,
    pub min: f64,
    pub max: f64,
    pub y_ticks: [f64; TICK_COUNT],
    pub step: f64,
    pub chart_width: f64,
    pub data_width: f64,
}

pub fn build_chart_series(
    payload: &DashboardPayload,
    now: NaiveDate,
    layout: &ChartLayout,
) -> ChartSeries {
    let past_keys = trailing_keys(now, TRAILING_MONTHS);
    let future_keys = leading_keys(now, LEADING_MONTHS);

    let past_actual = normalize(&payload.past_actual_6m, &past_keys);
    let future_projected = normalize(&payload.future_projected_12m, &future_keys);
    let future_bands = align_bands(
        &payload.future_projected_12m,
        &payload.confidence_band_by_month,
        &future_keys,
        payload.confidence.band,
    );

    let all_values: Vec<f64> = past_actual
        .iter()
        .chain(future_projected.iter())
        .copied()
        .collect();
    let axis = compute_axis_range(&all_values);

    let split_base_index = TRAILING_MONTHS - 1;
    let split = interpolate_boundary(
        now,
        split_base_index,
        past_actual.last().copied().unwrap_or(0.0),
    );

    let buckets: Vec<MonthBucket> = past_keys
        .into_iter()
        .chain(future_keys)
        .map(MonthBucket::from)
        .collect();
    let labels = buckets.iter().map(|b| b.label.clone()).collect();
    let bucket_count = buckets.len();

    ChartSeries {
        labels,
        past_actual,
        future_projected,
        future_bands,
        boundary_index: split_base_index,
        split_base_index: split.split_base_index,
        first_future_index: split.first_future_index,
        split_offset_fraction: split.offset_fraction,
        split_x: split.x,
        split_value: split.value,
        min: axis.min,
        max: axis.max,
        y_ticks: axis.y_ticks,
        step: axis.step,
        chart_width: layout.chart_width(bucket_count),
        data_width: layout.data_width(bucket_count),
        buckets,
    }
}
