use crate::aggregation::ProjectionWindow;
use crate::fallback::{Accept, FallbackChain};
use crate::schema::DashboardPayload;
use crate::utils::finite_or_zero;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const PROGRESS_PCT_CAP: f64 = 999.0;

/// Headline numbers for the dashboard cards, in whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetrics {
    pub actual_last_365: f64,
    pub actual_ytd: f64,
    pub projected_next_365: f64,
    pub projected_next_60: f64,
    pub projected_next_180: f64,
    pub projected_ytd: f64,
    pub progress_pct: f64,
}

pub fn actual_last_365_chain(payload: &DashboardPayload) -> FallbackChain {
    let component = payload
        .confidence
        .components
        .as_ref()
        .and_then(|c| c.total_actual_gci_last_12m);

    FallbackChain::new("actual_last_365")
        .or(
            "actuals.actual_gci_last_365",
            payload.actuals.actual_gci_last_365,
            Accept::Finite,
        )
        .or(
            "confidence.components.total_actual_gci_last_12m",
            component,
            Accept::Finite,
        )
        .or("actuals.actual_gci", payload.actuals.actual_gci, Accept::Finite)
}

pub fn actual_ytd_chain(payload: &DashboardPayload) -> FallbackChain {
    FallbackChain::new("actual_ytd")
        .or(
            "actuals.actual_gci_ytd",
            payload.actuals.actual_gci_ytd,
            Accept::Finite,
        )
        .or("actuals.actual_gci", payload.actuals.actual_gci, Accept::Finite)
}

pub fn projected_next_365_chain(
    payload: &DashboardPayload,
    window: &ProjectionWindow,
) -> FallbackChain {
    let future_total = window.total();

    FallbackChain::new("projected_next_365")
        .or(
            "projection.pc_next_365",
            payload.projection.pc_next_365,
            Accept::NonZero,
        )
        .or("sum(future_projected_12m)", Some(future_total), Accept::NonZero)
        .or(
            "projection.pc_90d * 4",
            payload.projection.pc_90d.map(|v| v * 4.0),
            Accept::Finite,
        )
}

pub fn projected_ytd_chain(
    payload: &DashboardPayload,
    window: &ProjectionWindow,
    actual_ytd: f64,
    now: NaiveDate,
) -> FallbackChain {
    let remaining_this_year = window.total_in_year(now.year());

    FallbackChain::new("projected_ytd")
        .or(
            "projection.projected_gci_ytd",
            payload.projection.projected_gci_ytd,
            Accept::NonZero,
        )
        .or(
            "actual_ytd + future rows this year",
            Some(actual_ytd + remaining_this_year),
            Accept::Finite,
        )
}

/// `actual_ytd / projected_next_365` as a percentage in `[0, 999]`.
pub fn progress_pct(actual_ytd: f64, projected_next_365: f64) -> f64 {
    if projected_next_365 > 0.0 {
        finite_or_zero(actual_ytd / projected_next_365 * 100.0).clamp(0.0, PROGRESS_PCT_CAP)
    } else {
        0.0
    }
}

pub fn derive_metrics(payload: &DashboardPayload, now: NaiveDate) -> CardMetrics {
    let window = ProjectionWindow::from_rows(&payload.future_projected_12m);

    let actual_last_365 = finite_or_zero(actual_last_365_chain(payload).resolve().value);
    let actual_ytd = finite_or_zero(actual_ytd_chain(payload).resolve().value);
    let projected_next_365 =
        finite_or_zero(projected_next_365_chain(payload, &window).resolve().value);
    let projected_next_60 = finite_or_zero(window.sum_days(60));
    let projected_next_180 = finite_or_zero(window.sum_days(180));
    let projected_ytd = finite_or_zero(
        projected_ytd_chain(payload, &window, actual_ytd, now)
            .resolve()
            .value,
    );

    CardMetrics {
        actual_last_365,
        actual_ytd,
        projected_next_365,
        projected_next_60,
        projected_next_180,
        projected_ytd,
        progress_pct: progress_pct(actual_ytd, projected_next_365),
    }
}
