use crate::utils::finite_or_zero;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    #[schemars(description = "Forecast is well supported by pipeline and history")]
    Green,

    #[schemars(description = "Forecast carries moderate risk")]
    Yellow,

    #[schemars(description = "Forecast carries high risk")]
    Red,
}

impl ConfidenceBand {
    /// Case-insensitive parse; anything other than green/yellow/red is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "red" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct MonthlyRow {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(
        description = "First day of the bucket month, YYYY-MM-DD. Only the YYYY-MM prefix is significant."
    )]
    pub month_start: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(description = "GCI for the month in whole currency units")]
    pub value: Option<f64>,
}

impl MonthlyRow {
    pub fn new(month_start: impl Into<String>, value: f64) -> Self {
        Self {
            month_start: Some(month_start.into()),
            value: Some(value),
        }
    }

    /// The row value with missing or non-finite amounts coerced to zero.
    pub fn value_or_zero(&self) -> f64 {
        finite_or_zero(self.value.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Actuals {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_gci: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_gci_last_365: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_gci_ytd: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Projection {
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(description = "Projected GCI closing within the next 90 days")]
    pub pc_90d: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(description = "Projected GCI closing within the next 365 days")]
    pub pc_next_365: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub projected_gci_ytd: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ConfidenceComponents {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_actual_gci_last_12m: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Confidence {
    #[serde(default, deserialize_with = "lenient_f64")]
    #[schemars(description = "Opaque confidence score supplied upstream")]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_band")]
    pub band: Option<ConfidenceBand>,

    #[serde(default)]
    pub components: Option<ConfidenceComponents>,
}

/// The dashboard payload delivered by the forecasting API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct DashboardPayload {
    #[serde(default)]
    pub actuals: Actuals,

    #[serde(default)]
    pub projection: Projection,

    #[serde(default)]
    pub confidence: Confidence,

    #[serde(default, deserialize_with = "lenient_rows")]
    #[schemars(description = "Actual GCI for trailing months, any order, may be sparse")]
    pub past_actual_6m: Vec<MonthlyRow>,

    #[serde(default, deserialize_with = "lenient_rows")]
    #[schemars(description = "Projected GCI for forward months, any order, may be sparse")]
    pub future_projected_12m: Vec<MonthlyRow>,

    #[serde(default, deserialize_with = "lenient_bands")]
    #[schemars(
        description = "Per-month confidence tags aligned by position to future_projected_12m"
    )]
    pub confidence_band_by_month: Vec<Option<ConfidenceBand>>,
}

impl DashboardPayload {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardPayload)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

fn number_from_value(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(number_from_value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn band_from_value(value: Value) -> Option<ConfidenceBand> {
    match value {
        Value::String(s) => ConfidenceBand::parse(&s),
        _ => None,
    }
}

fn lenient_band<'de, D>(deserializer: D) -> Result<Option<ConfidenceBand>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(band_from_value))
}

// Unknown tags keep their slot so positions still line up with the rows.
fn lenient_bands<'de, D>(deserializer: D) -> Result<Vec<Option<ConfidenceBand>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items.into_iter().map(band_from_value).collect(),
        _ => Vec::new(),
    })
}

// Rows that are not objects are dropped; bad fields inside a row degrade to `None`.
fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<MonthlyRow>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value::<MonthlyRow>(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = DashboardPayload::schema_as_json().unwrap();
        assert!(schema_json.contains("past_actual_6m"));
        assert!(schema_json.contains("future_projected_12m"));
        assert!(schema_json.contains("confidence_band_by_month"));
    }

    #[test]
    fn test_lenient_numbers() {
        let payload = DashboardPayload::from_json_str(
            r#"{
                "actuals": { "actual_gci": "125000", "actual_gci_ytd": true, "actual_gci_last_365": null },
                "projection": { "pc_90d": 50000, "pc_next_365": "NaN" }
            }"#,
        )
        .unwrap();

        assert_eq!(payload.actuals.actual_gci, Some(125000.0));
        assert_eq!(payload.actuals.actual_gci_ytd, None);
        assert_eq!(payload.actuals.actual_gci_last_365, None);
        assert_eq!(payload.projection.pc_90d, Some(50000.0));
        assert!(payload.projection.pc_next_365.unwrap().is_nan());
        assert_eq!(payload.projection.projected_gci_ytd, None);
    }

    #[test]
    fn test_missing_sections_default() {
        let payload = DashboardPayload::from_json_str("{}").unwrap();
        assert!(payload.past_actual_6m.is_empty());
        assert!(payload.future_projected_12m.is_empty());
        assert!(payload.confidence_band_by_month.is_empty());
        assert_eq!(payload.confidence.band, None);
    }

    #[test]
    fn test_bands_keep_positions() {
        let payload = DashboardPayload::from_json_str(
            r#"{ "confidence_band_by_month": ["green", "purple", null, "RED"] }"#,
        )
        .unwrap();

        assert_eq!(
            payload.confidence_band_by_month,
            vec![
                Some(ConfidenceBand::Green),
                None,
                None,
                Some(ConfidenceBand::Red)
            ]
        );
    }

    #[test]
    fn test_rows_tolerate_bad_entries() {
        let payload = DashboardPayload::from_json_str(
            r#"{
                "past_actual_6m": [
                    { "month_start": "2026-05-01", "value": 12000 },
                    42,
                    { "month_start": 20260601, "value": "8000" }
                ],
                "future_projected_12m": null
            }"#,
        )
        .unwrap();

        assert_eq!(payload.past_actual_6m.len(), 2);
        assert_eq!(payload.past_actual_6m[1].month_start, None);
        assert_eq!(payload.past_actual_6m[1].value_or_zero(), 8000.0);
        assert!(payload.future_projected_12m.is_empty());
    }

    #[test]
    fn test_confidence_band_parse() {
        assert_eq!(ConfidenceBand::parse(" Yellow "), Some(ConfidenceBand::Yellow));
        assert_eq!(ConfidenceBand::parse("amber"), None);
        assert_eq!(ConfidenceBand::Green.to_string(), "green");
    }
}
