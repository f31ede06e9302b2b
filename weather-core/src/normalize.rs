//! Map raw OpenWeather samples onto the stable response schema.

use tracing::warn;

use crate::{
    error::ForecastError,
    model::{CurrentConditions, DailyForecastPoint, ForecastRequest, ForecastResult},
    provider::{UpstreamSnapshot, openweather::OwCurrentResponse},
    reduce::{DailySample, daily_samples},
};

const MPS_TO_KMH: f64 = 3.6;

/// `Mon, Jan 6`
const DISPLAY_DATE_FORMAT: &str = "%a, %b %-d";

/// Build the response for `request` from the raw upstream payloads.
///
/// Current temperature, humidity and condition are required; anything else that is missing
/// degrades to `0` or an empty string.
pub fn normalize(
    request: &ForecastRequest,
    snapshot: &UpstreamSnapshot,
) -> Result<ForecastResult, ForecastError> {
    let current = current_conditions(&snapshot.current)?;

    let forecast = daily_samples(&snapshot.forecast.list, snapshot.forecast.utc_offset_secs())
        .into_iter()
        .map(daily_point)
        .collect();

    let location = request
        .location
        .clone()
        .or_else(|| snapshot.current.name.clone())
        .or_else(|| snapshot.forecast.city_name().map(str::to_owned))
        .unwrap_or_default();

    Ok(ForecastResult {
        location,
        current,
        forecast,
    })
}

fn current_conditions(raw: &OwCurrentResponse) -> Result<CurrentConditions, ForecastError> {
    let main = raw.main.as_ref();

    let temp = main
        .and_then(|m| m.temp)
        .ok_or_else(|| missing_field("main.temp"))?;
    let humidity = main
        .and_then(|m| m.humidity)
        .ok_or_else(|| missing_field("main.humidity"))?;
    let description = raw
        .condition()
        .ok_or_else(|| missing_field("weather[0].main"))?;

    let wind_mps = raw.wind.as_ref().and_then(|w| w.speed).unwrap_or_else(|| {
        warn!("current wind speed missing, defaulting to 0");
        0.0
    });
    let cloud_cover = raw.clouds.as_ref().and_then(|c| c.all).unwrap_or(0.0);

    Ok(CurrentConditions {
        temp: round(temp),
        humidity: round(humidity),
        description: description.to_string(),
        rain_chance: round(cloud_cover),
        wind_speed_kmh: mps_to_kmh(wind_mps),
    })
}

fn daily_point(sample: DailySample<'_>) -> DailyForecastPoint {
    let main = sample.entry.main.as_ref();

    DailyForecastPoint {
        display_date: sample.date.format(DISPLAY_DATE_FORMAT).to_string(),
        temp_max: round(main.and_then(|m| m.temp_max).unwrap_or(0.0)),
        temp_min: round(main.and_then(|m| m.temp_min).unwrap_or(0.0)),
        condition: sample.entry.condition().unwrap_or_default().to_string(),
    }
}

fn missing_field(field: &str) -> ForecastError {
    ForecastError::upstream(format!(
        "OpenWeather current response is missing `{field}`"
    ))
}

/// Round half away from zero to a whole number.
pub fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Convert metres per second to whole kilometres per hour.
pub fn mps_to_kmh(mps: f64) -> i64 {
    round(mps * MPS_TO_KMH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{OwCurrentResponse, OwForecastResponse};
    use serde_json::{Value, json};

    // 2025-01-06T00:00:00Z
    const MONDAY_MIDNIGHT: i64 = 1_736_121_600;

    fn snapshot(current: Value, forecast: Value) -> UpstreamSnapshot {
        UpstreamSnapshot {
            current: serde_json::from_value::<OwCurrentResponse>(current).unwrap(),
            forecast: serde_json::from_value::<OwForecastResponse>(forecast).unwrap(),
        }
    }

    fn full_current() -> Value {
        json!({
            "name": "Mbale",
            "main": { "temp": 24.6, "humidity": 81 },
            "weather": [{ "main": "Rain", "description": "moderate rain" }],
            "wind": { "speed": 5.0 },
            "clouds": { "all": 90 }
        })
    }

    fn two_day_forecast() -> Value {
        json!({
            "city": { "timezone": 0 },
            "list": [
                { "dt": MONDAY_MIDNIGHT + 9 * 3600,
                  "main": { "temp_min": 18.4, "temp_max": 24.6 },
                  "weather": [{ "main": "Clouds" }] },
                { "dt": MONDAY_MIDNIGHT + 12 * 3600,
                  "main": { "temp_min": 20.0, "temp_max": 29.0 },
                  "weather": [{ "main": "Clear" }] },
                { "dt": MONDAY_MIDNIGHT + 24 * 3600,
                  "main": { "temp_min": 17.5, "temp_max": 22.49 },
                  "weather": [{ "main": "Rain" }] }
            ]
        })
    }

    fn request(label: Option<&str>) -> ForecastRequest {
        ForecastRequest::new(1.0467, 34.1867, label.map(str::to_owned))
    }

    #[test]
    fn maps_current_conditions() {
        let result = normalize(&request(None), &snapshot(full_current(), json!({}))).unwrap();

        assert_eq!(
            result.current,
            CurrentConditions {
                temp: 25,
                humidity: 81,
                description: "Rain".into(),
                rain_chance: 90,
                wind_speed_kmh: 18,
            }
        );
        assert!(result.forecast.is_empty());
    }

    #[test]
    fn wind_is_converted_to_kmh() {
        assert_eq!(mps_to_kmh(5.0), 18);
        assert_eq!(mps_to_kmh(0.0), 0);
        assert_eq!(mps_to_kmh(3.47), 12);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(24.6), 25);
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -3);
        assert_eq!(round(22.49), 22);
    }

    #[test]
    fn forecast_keeps_first_sample_per_day() {
        let result =
            normalize(&request(None), &snapshot(full_current(), two_day_forecast())).unwrap();

        assert_eq!(
            result.forecast,
            vec![
                DailyForecastPoint {
                    display_date: "Mon, Jan 6".into(),
                    temp_max: 25,
                    temp_min: 18,
                    condition: "Clouds".into(),
                },
                DailyForecastPoint {
                    display_date: "Tue, Jan 7".into(),
                    temp_max: 22,
                    temp_min: 18,
                    condition: "Rain".into(),
                },
            ]
        );
    }

    #[test]
    fn caller_label_wins_over_provider_name() {
        let labelled = normalize(&request(Some("Mbale Farm")), &snapshot(full_current(), json!({})))
            .unwrap();
        let unlabelled = normalize(&request(None), &snapshot(full_current(), json!({}))).unwrap();

        assert_eq!(labelled.location, "Mbale Farm");
        assert_eq!(unlabelled.location, "Mbale");
    }

    #[test]
    fn forecast_city_names_the_location_when_current_has_none() {
        let current = json!({
            "main": { "temp": 20.0, "humidity": 50 },
            "weather": [{ "main": "Clear" }]
        });
        let forecast = json!({ "city": { "name": "Lira", "timezone": 10800 } });

        let result = normalize(&request(None), &snapshot(current, forecast)).unwrap();

        assert_eq!(result.location, "Lira");
    }

    #[test]
    fn null_weather_arrays_degrade_to_defaults() {
        let forecast = json!({
            "list": [
                { "dt": MONDAY_MIDNIGHT,
                  "main": { "temp_min": 18.0, "temp_max": 26.0 },
                  "weather": null }
            ]
        });

        let result = normalize(&request(None), &snapshot(full_current(), forecast)).unwrap();
        assert_eq!(result.forecast.len(), 1);
        assert_eq!(result.forecast[0].condition, "");
        assert_eq!(result.forecast[0].temp_max, 26);

        let result =
            normalize(&request(None), &snapshot(full_current(), json!({ "list": null }))).unwrap();
        assert!(result.forecast.is_empty());

        let current = json!({ "main": { "temp": 20.0, "humidity": 50 }, "weather": null });
        let err = normalize(&request(None), &snapshot(current, json!({}))).unwrap_err();
        assert!(matches!(err, ForecastError::Upstream(_)));
    }

    #[test]
    fn optional_fields_degrade_to_defaults() {
        let current = json!({
            "main": { "temp": 20.0, "humidity": 50 },
            "weather": [{ "main": "Clear" }]
        });
        let forecast = json!({
            "list": [{ "dt": MONDAY_MIDNIGHT }]
        });

        let result = normalize(&request(None), &snapshot(current, forecast)).unwrap();

        assert_eq!(result.location, "");
        assert_eq!(result.current.rain_chance, 0);
        assert_eq!(result.current.wind_speed_kmh, 0);
        assert_eq!(result.forecast.len(), 1);
        assert_eq!(result.forecast[0].temp_max, 0);
        assert_eq!(result.forecast[0].temp_min, 0);
        assert_eq!(result.forecast[0].condition, "");
    }

    #[test]
    fn missing_required_current_fields_are_upstream_errors() {
        let cases = [
            json!({ "main": { "humidity": 50 }, "weather": [{ "main": "Clear" }] }),
            json!({ "main": { "temp": 20.0 }, "weather": [{ "main": "Clear" }] }),
            json!({ "main": { "temp": 20.0, "humidity": 50 }, "weather": [] }),
            json!({ "weather": [{ "main": "Clear" }] }),
        ];

        for current in cases {
            let err = normalize(&request(None), &snapshot(current, json!({}))).unwrap_err();
            assert!(matches!(err, ForecastError::Upstream(_)), "got {err:?}");
        }
    }
}
