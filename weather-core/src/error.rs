use thiserror::Error;

/// Message returned to callers for any upstream failure. The detailed cause is only logged.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch weather";

/// Failure taxonomy of the forecast pipeline.
///
/// Every variant is surfaced to the caller as `{ "error": message }`; none of them is fatal to
/// the process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// Missing or malformed caller input (coordinates, body shape).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service is not deployed with the configuration it needs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure, non-success upstream status, or an incomplete upstream payload.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl ForecastError {
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream(message.into())
    }

    /// The string placed in the `error` field of a failure response.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::InvalidRequest(message) | ForecastError::Configuration(message) => {
                message.clone()
            }
            ForecastError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Short machine-friendly name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::InvalidRequest(_) => "invalid_request",
            ForecastError::Configuration(_) => "configuration",
            ForecastError::Upstream(_) => "upstream",
        }
    }
}
