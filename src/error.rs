use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Invalid dashboard configuration: {0}")]
    InvalidConfig(String),

    #[error("Confidence refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Confidence endpoint rejected the request (status {status}): {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
