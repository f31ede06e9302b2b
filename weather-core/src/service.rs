use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    error::ForecastError,
    model::{ForecastRequest, ForecastResult},
    normalize::normalize,
    provider::WeatherProvider,
};

/// The forecast pipeline: validate, fetch, reduce, normalize.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct ForecastService {
    provider: Arc<dyn WeatherProvider>,
}

impl ForecastService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Run the pipeline for a decoded request body.
    pub async fn forecast_from_body(&self, body: &Value) -> Result<ForecastResult, ForecastError> {
        let request = ForecastRequest::from_body(body)?;
        self.forecast(&request).await
    }

    /// Run the pipeline for an already validated request.
    #[instrument(skip(self), fields(lat = request.coordinates.lat, lon = request.coordinates.lon))]
    pub async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastError> {
        let snapshot = self.provider.fetch(request.coordinates).await?;
        let result = normalize(request, &snapshot)?;

        info!(
            location = %result.location,
            days = result.forecast.len(),
            "forecast ready"
        );

        Ok(result)
    }
}
