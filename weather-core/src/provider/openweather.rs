use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::OpenWeatherConfig,
    error::ForecastError,
    model::Coordinates,
    provider::{UpstreamSnapshot, WeatherProvider},
};

pub const MISSING_API_KEY_MESSAGE: &str = "OpenWeather API key not configured";

/// Client for the OpenWeather "current weather" and "5 day / 3 hour forecast" endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cassava-weather/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &OpenWeatherConfig) -> Result<Self> {
        Self::new(
            config.api_key().map(str::to_owned),
            config.base_url(),
            config.timeout(),
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        api_key: &str,
        coordinates: Coordinates,
    ) -> Result<T, ForecastError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                ForecastError::upstream(format!(
                    "Failed to send request to OpenWeather ({endpoint}): {e}"
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ForecastError::upstream(format!(
                "Failed to read OpenWeather {endpoint} response body: {e}"
            ))
        })?;

        if !status.is_success() {
            return Err(ForecastError::upstream(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ForecastError::upstream(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(lat = coordinates.lat, lon = coordinates.lon))]
    async fn fetch(&self, coordinates: Coordinates) -> Result<UpstreamSnapshot, ForecastError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ForecastError::configuration(MISSING_API_KEY_MESSAGE))?;

        let (current, forecast) = tokio::try_join!(
            self.get_json::<OwCurrentResponse>("weather", api_key, coordinates),
            self.get_json::<OwForecastResponse>("forecast", api_key, coordinates),
        )?;

        debug!(
            place = current.name.as_deref().unwrap_or_default(),
            entries = forecast.list.len(),
            "OpenWeather responded"
        );

        Ok(UpstreamSnapshot { current, forecast })
    }
}

// Every field is optional here; which ones are required is decided by the normalizer.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwMain {
    pub temp: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwWeather {
    /// Short condition group, e.g. "Rain", "Clouds", "Clear".
    pub main: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwWind {
    /// Metres per second in metric units.
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwClouds {
    /// Cloud cover percentage.
    pub all: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwCurrentResponse {
    pub name: Option<String>,
    pub main: Option<OwMain>,
    #[serde(deserialize_with = "null_as_empty")]
    pub weather: Vec<OwWeather>,
    pub wind: Option<OwWind>,
    pub clouds: Option<OwClouds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwCity {
    pub name: Option<String>,
    /// Shift in seconds from UTC.
    pub timezone: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwForecastEntry {
    pub dt: Option<i64>,
    pub main: Option<OwMain>,
    #[serde(deserialize_with = "null_as_empty")]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwForecastResponse {
    pub city: Option<OwCity>,
    #[serde(deserialize_with = "null_as_empty")]
    pub list: Vec<OwForecastEntry>,
}

impl OwCurrentResponse {
    pub fn condition(&self) -> Option<&str> {
        first_condition(&self.weather)
    }
}

impl OwForecastEntry {
    pub fn condition(&self) -> Option<&str> {
        first_condition(&self.weather)
    }
}

impl OwForecastResponse {
    /// UTC offset of the forecast location in seconds, 0 when unknown.
    pub fn utc_offset_secs(&self) -> i64 {
        self.city.as_ref().and_then(|c| c.timezone).unwrap_or(0)
    }

    pub fn city_name(&self) -> Option<&str> {
        self.city.as_ref().and_then(|c| c.name.as_deref())
    }
}

/// Decode a JSON array that may also arrive as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn first_condition(weather: &[OwWeather]) -> Option<&str> {
    weather.first().and_then(|w| w.main.as_deref())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
