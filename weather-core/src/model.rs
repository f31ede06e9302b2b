use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ForecastError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Validated input of one forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub coordinates: Coordinates,
    /// Display-only label chosen by the caller.
    pub location: Option<String>,
}

impl ForecastRequest {
    pub fn new(lat: f64, lon: f64, location: Option<String>) -> Self {
        Self {
            coordinates: Coordinates { lat, lon },
            location: location.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Extract coordinates and the optional label from a decoded request body
    /// (`{ "lat": number, "lon": number, "location"?: string }`).
    ///
    /// Only presence and numeric type are checked; the values are not range-validated.
    pub fn from_body(body: &Value) -> Result<Self, ForecastError> {
        let object = body
            .as_object()
            .ok_or_else(|| ForecastError::invalid_request("Request body must be a JSON object"))?;

        let lat = object.get("lat").and_then(Value::as_f64);
        let lon = object.get("lon").and_then(Value::as_f64);

        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(ForecastError::invalid_request(
                "Latitude and longitude required",
            ));
        };

        let location = object
            .get("location")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self::new(lat, lon, location))
    }
}

/// Normalized conditions "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: i64,
    pub humidity: i64,
    pub description: String,
    /// Cloud-cover percentage of the current sample, 0..=100.
    #[serde(rename = "rainChance")]
    pub rain_chance: i64,
    /// Wind speed in km/h.
    #[serde(rename = "windSpeed")]
    pub wind_speed_kmh: i64,
}

/// One representative sample per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastPoint {
    /// Display date, e.g. `Mon, Jan 6`.
    #[serde(rename = "date")]
    pub display_date: String,
    pub temp_max: i64,
    pub temp_min: i64,
    #[serde(rename = "description")]
    pub condition: String,
}

/// Response body of a successful forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub location: String,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecastPoint>,
}
