use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ForecastError,
    model::Coordinates,
    provider::openweather::{OwCurrentResponse, OwForecastResponse},
};

pub mod openweather;

/// Raw upstream payloads for one request: conditions "now" plus the 3-hourly forecast list.
#[derive(Debug, Clone, Default)]
pub struct UpstreamSnapshot {
    pub current: OwCurrentResponse,
    pub forecast: OwForecastResponse,
}

/// Source of raw weather data for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the multi-day forecast for `coordinates`.
    ///
    /// Implementations make a single attempt and report every failure as
    /// [`ForecastError::Configuration`] or [`ForecastError::Upstream`].
    async fn fetch(&self, coordinates: Coordinates) -> Result<UpstreamSnapshot, ForecastError>;
}
