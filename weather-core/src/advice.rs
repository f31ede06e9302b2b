//! Farming recommendations and alerts derived from current conditions.

use crate::model::CurrentConditions;

const HIGH_WIND_KMH: i64 = 20;
const HUMID: i64 = 70;
const VERY_HUMID: i64 = 85;
const HEAVY_RAIN_CHANCE: i64 = 80;
const LOW_RAIN_CHANCE: i64 = 20;
const DRY_AIR: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    HighWinds,
    HighHumidity,
    HeavyRainExpected,
    LowMoisture,
}

impl Alert {
    pub fn title(&self) -> &'static str {
        match self {
            Alert::HighWinds => "High Winds",
            Alert::HighHumidity => "High Humidity",
            Alert::HeavyRainExpected => "Heavy Rain Expected",
            Alert::LowMoisture => "Low Moisture",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Alert::HighWinds => "Secure crops and avoid pesticide application",
            Alert::HighHumidity => "Risk of fungal diseases - monitor closely",
            Alert::HeavyRainExpected => "Prepare fields for drainage",
            Alert::LowMoisture => "Plan irrigation activities",
        }
    }
}

const RAINY: &[&str] = &[
    "Good conditions for weeding and fertilizer application",
    "Avoid harvesting during heavy rain",
    "Ensure proper drainage to prevent root rot",
];

const HUMID_TIPS: &[&str] = &[
    "Monitor for pests and diseases",
    "Apply fungicides if needed",
    "Ensure good air circulation",
];

const DRY_TIPS: &[&str] = &[
    "Consider irrigation if soil is dry",
    "Good time for planting",
    "Water early morning or late evening",
];

pub fn recommendations(current: &CurrentConditions) -> &'static [&'static str] {
    if current.description.to_lowercase().contains("rain") {
        RAINY
    } else if current.humidity > HUMID {
        HUMID_TIPS
    } else {
        DRY_TIPS
    }
}

pub fn alerts(current: &CurrentConditions) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if current.wind_speed_kmh > HIGH_WIND_KMH {
        alerts.push(Alert::HighWinds);
    }
    if current.humidity > VERY_HUMID {
        alerts.push(Alert::HighHumidity);
    }
    if current.rain_chance > HEAVY_RAIN_CHANCE {
        alerts.push(Alert::HeavyRainExpected);
    }
    if current.rain_chance < LOW_RAIN_CHANCE && current.humidity < DRY_AIR {
        alerts.push(Alert::LowMoisture);
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(description: &str, humidity: i64, rain_chance: i64, wind: i64) -> CurrentConditions {
        CurrentConditions {
            temp: 25,
            humidity,
            description: description.into(),
            rain_chance,
            wind_speed_kmh: wind,
        }
    }

    #[test]
    fn rain_takes_precedence_over_humidity() {
        let tips = recommendations(&conditions("Rain", 95, 50, 5));
        assert_eq!(tips, RAINY);
    }

    #[test]
    fn humid_without_rain() {
        assert_eq!(recommendations(&conditions("Clouds", 71, 50, 5)), HUMID_TIPS);
        assert_eq!(recommendations(&conditions("Clouds", 70, 50, 5)), DRY_TIPS);
    }

    #[test]
    fn stormy_conditions_raise_alerts() {
        let alerts = alerts(&conditions("Thunderstorm", 90, 95, 36));
        assert_eq!(
            alerts,
            vec![Alert::HighWinds, Alert::HighHumidity, Alert::HeavyRainExpected]
        );
    }

    #[test]
    fn dry_calm_day_flags_low_moisture_only() {
        assert_eq!(alerts(&conditions("Clear", 45, 5, 10)), vec![Alert::LowMoisture]);
        assert!(alerts(&conditions("Clear", 60, 5, 20)).is_empty());
    }
}
