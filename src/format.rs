use crate::metrics::CardMetrics;
use crate::utils::finite_or_zero;
use serde::Serialize;

/// Whole-dollar currency with thousands separators, e.g. `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let rounded = finite_or_zero(value).round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}", sign, grouped)
}

/// Axis label for a value already in thousands: `$0`, `$45K`, `$1.2M`.
pub fn format_compact_thousands(thousands: f64) -> String {
    let value = finite_or_zero(thousands);
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    if magnitude == 0.0 {
        "$0".to_string()
    } else if magnitude >= 1000.0 {
        let millions = format!("{:.1}", magnitude / 1000.0);
        let trimmed = millions.strip_suffix(".0").unwrap_or(&millions);
        format!("{}${}M", sign, trimmed)
    } else {
        format!("{}${:.0}K", sign, magnitude.round())
    }
}

pub fn format_percent(pct: f64) -> String {
    format!("{:.0}%", finite_or_zero(pct).round())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

/// Card titles and display strings in dashboard order.
pub fn metric_cards(metrics: &CardMetrics) -> Vec<MetricCard> {
    let card = |title, value| MetricCard { title, value };
    vec![
        card("Actual GCI (365d)", format_currency(metrics.actual_last_365)),
        card("Actual GCI YTD", format_currency(metrics.actual_ytd)),
        card("Projected (60d)", format_currency(metrics.projected_next_60)),
        card("Projected (180d)", format_currency(metrics.projected_next_180)),
        card("Projected (365d)", format_currency(metrics.projected_next_365)),
        card("Projected YTD", format_currency(metrics.projected_ytd)),
        card("Progress", format_percent(metrics.progress_pct)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-45_000.0), "-$45,000");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn test_format_compact_thousands() {
        assert_eq!(format_compact_thousands(0.0), "$0");
        assert_eq!(format_compact_thousands(45.0), "$45K");
        assert_eq!(format_compact_thousands(1_200.0), "$1.2M");
        assert_eq!(format_compact_thousands(2_000.0), "$2M");
        assert_eq!(format_compact_thousands(-15.0), "-$15K");
    }

    #[test]
    fn test_metric_cards() {
        let metrics = CardMetrics {
            actual_last_365: 250_000.0,
            actual_ytd: 120_000.0,
            projected_next_365: 300_000.0,
            projected_next_60: 45_000.0,
            projected_next_180: 150_000.0,
            projected_ytd: 180_000.0,
            progress_pct: 40.0,
        };
        let cards = metric_cards(&metrics);
        assert_eq!(cards.len(), 7);
        assert_eq!(cards[0].value, "$250,000");
        assert_eq!(cards[6].value, "40%");
    }
}
