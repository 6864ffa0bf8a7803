use crate::chart::ChartLayout;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Confidence endpoint; refresh stays disabled when unset.
    pub endpoint: Option<String>,
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub layout: ChartLayout,
    pub refresh: RefreshConfig,
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        for (name, value) in [
            ("layout.point_spacing", layout.point_spacing),
            ("layout.y_axis_width", layout.y_axis_width),
            ("layout.trailing_padding", layout.trailing_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ForecastError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if layout.point_spacing == 0.0 {
            return Err(ForecastError::InvalidConfig(
                "layout.point_spacing must be greater than zero".to_string(),
            ));
        }

        if self.refresh.interval_secs == 0 {
            return Err(ForecastError::InvalidConfig(
                "refresh.interval_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(endpoint) = &self.refresh.endpoint {
            if endpoint.trim().is_empty() {
                return Err(ForecastError::InvalidConfig(
                    "refresh.endpoint must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
