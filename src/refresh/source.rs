use crate::error::{ForecastError, Result};
use crate::schema::{Confidence, ConfidenceBand};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// The two fields a refresh is allowed to replace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceUpdate {
    pub score: f64,
    pub band: ConfidenceBand,
}

#[derive(Debug, Deserialize)]
struct ConfidenceResponse {
    confidence: Confidence,
}

impl ConfidenceUpdate {
    /// Parses `{ "confidence": { "score": .., "band": .. } }`. Both fields
    /// must be present and the score finite.
    pub fn from_response_body(body: &str) -> Result<Self> {
        let response: ConfidenceResponse = serde_json::from_str(body)?;
        let Confidence { score, band, .. } = response.confidence;

        match (score.filter(|s| s.is_finite()), band) {
            (Some(score), Some(band)) => Ok(Self { score, band }),
            _ => Err(ForecastError::RefreshFailed(
                "response is missing a usable confidence.score or confidence.band".to_string(),
            )),
        }
    }
}

/// Anything that can produce a fresh confidence reading.
pub trait ConfidenceSource: Send + Sync + 'static {
    fn fetch_confidence(&self) -> BoxFuture<'_, Result<ConfidenceUpdate>>;
}

#[cfg(feature = "http")]
pub use http::HttpConfidenceSource;

#[cfg(feature = "http")]
mod http {
    use super::{ConfidenceSource, ConfidenceUpdate};
    use crate::config::RefreshConfig;
    use crate::error::{ForecastError, Result};
    use futures::future::{BoxFuture, FutureExt};
    use reqwest::Client;

    /// Issues a parameterless POST against the confidence endpoint.
    #[derive(Clone)]
    pub struct HttpConfidenceSource {
        client: Client,
        endpoint: String,
    }

    impl HttpConfidenceSource {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self::with_client(Client::new(), endpoint)
        }

        /// Reuse a client that already carries auth headers and timeouts.
        pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
            Self {
                client,
                endpoint: endpoint.into(),
            }
        }

        pub fn from_config(config: &RefreshConfig) -> Result<Self> {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                ForecastError::InvalidConfig("refresh.endpoint is not set".to_string())
            })?;
            Ok(Self::new(endpoint))
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }

        async fn post(&self) -> Result<ConfidenceUpdate> {
            let res = self.client.post(&self.endpoint).send().await?;
            let status = res.status();

            if !status.is_success() {
                let body = res.text().await?;
                return Err(ForecastError::RefreshRejected {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = res.text().await?;
            ConfidenceUpdate::from_response_body(&body)
        }
    }

    impl ConfidenceSource for HttpConfidenceSource {
        fn fetch_confidence(&self) -> BoxFuture<'_, Result<ConfidenceUpdate>> {
            self.post().boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let update = ConfidenceUpdate::from_response_body(
            r#"{ "confidence": { "score": 0.82, "band": "green", "extra": 1 }, "other": {} }"#,
        )
        .unwrap();
        assert_eq!(update.score, 0.82);
        assert_eq!(update.band, ConfidenceBand::Green);
    }

    #[test]
    fn test_parse_response_missing_fields() {
        assert!(matches!(
            ConfidenceUpdate::from_response_body(r#"{ "confidence": { "score": 0.5 } }"#),
            Err(ForecastError::RefreshFailed(_))
        ));
        assert!(matches!(
            ConfidenceUpdate::from_response_body(
                r#"{ "confidence": { "score": "NaN", "band": "red" } }"#
            ),
            Err(ForecastError::RefreshFailed(_))
        ));
        assert!(matches!(
            ConfidenceUpdate::from_response_body(r#"{ "score": 0.5 }"#),
            Err(ForecastError::SerializationError(_))
        ));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_source_from_config() {
        use crate::config::RefreshConfig;

        assert!(HttpConfidenceSource::from_config(&RefreshConfig::default()).is_err());

        let config = RefreshConfig {
            endpoint: Some("https://api.example.com/forecast/confidence".to_string()),
            ..Default::default()
        };
        let source = HttpConfidenceSource::from_config(&config).unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/forecast/confidence");
    }
}
