use anyhow::{Context, Result, anyhow, bail};
use cassava_weather_core::{
    Config, ForecastRequest, ForecastResult, ForecastService, OpenWeatherProvider, advice,
    presets::{PRESET_LOCATIONS, find_preset},
};
use clap::{Parser, Subcommand};
use std::{fmt, sync::Arc};
use tracing::warn;

use crate::http;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "cassava-weather",
    version,
    about = "Weather forecasts for cassava farmers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the forecast endpoint over HTTP.
    Serve {
        /// Listen address; overrides the config file and environment.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show the forecast for a preset location or explicit coordinates.
    Show {
        /// Preset name (e.g. "Gulu"), or a display label when coordinates are given.
        location: Option<String>,

        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Print the raw JSON payload instead of a report.
        #[arg(long)]
        json: bool,
    },

    /// List the preset locations.
    Locations,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Serve { addr } => {
                let config = Config::load()?.with_env_overrides();
                let service = build_service(&config)?;
                let addr = addr.unwrap_or_else(|| config.server.addr().to_string());
                http::serve(&addr, service).await?;
            }
            Command::Configure => configure()?,
            Command::Show {
                location,
                lat,
                lon,
                json,
            } => {
                let request = resolve_request(location, lat, lon)?;
                let config = Config::load()?.with_env_overrides();
                let result = build_service(&config)?.forecast(&request).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{}", Report(&result));
                }
            }
            Command::Locations => {
                for loc in PRESET_LOCATIONS {
                    println!("{:<12} {:<10} {:>8.4} {:>8.4}", loc.name, loc.region, loc.lat, loc.lon);
                }
            }
        }

        Ok(())
    }
}

/// Construct the pipeline from resolved configuration.
fn build_service(config: &Config) -> Result<ForecastService> {
    if !config.is_api_key_configured() {
        warn!(
            "No OpenWeather API key configured; forecasts will fail until one is set. \
             Hint: export OPENWEATHER_API_KEY or run `cassava-weather configure`."
        );
    }

    let provider = OpenWeatherProvider::from_config(&config.openweather)?;
    Ok(ForecastService::new(Arc::new(provider)))
}

fn configure() -> Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    // Without env overrides: only the file's own values are written back.
    let mut config = Config::load()?;
    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn resolve_request(
    location: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<ForecastRequest> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(ForecastRequest::new(lat, lon, location));
    }

    let name = location.ok_or_else(|| {
        anyhow!("Give a preset location name or both --lat and --lon")
    })?;

    let preset = find_preset(&name).ok_or_else(|| {
        anyhow!("Unknown location '{name}'. Run `cassava-weather locations` for the list.")
    })?;

    Ok(ForecastRequest {
        coordinates: preset.coordinates(),
        location: Some(preset.name.to_string()),
    })
}

/// Human-readable report with farming advice.
pub struct Report<'a>(pub &'a ForecastResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let current = &result.current;

        writeln!(f, "Weather for {}", result.location)?;
        writeln!(
            f,
            "Now: {}°C, {}, humidity {}%, rain chance {}%, wind {} km/h",
            current.temp,
            current.description,
            current.humidity,
            current.rain_chance,
            current.wind_speed_kmh
        )?;

        if !result.forecast.is_empty() {
            writeln!(f, "\nForecast:")?;
            for day in &result.forecast {
                writeln!(
                    f,
                    "  {:<12} {:>3}°C / {:>3}°C  {}",
                    day.display_date, day.temp_max, day.temp_min, day.condition
                )?;
            }
        }

        writeln!(f, "\nFarming recommendations:")?;
        for tip in advice::recommendations(current) {
            writeln!(f, "  - {tip}")?;
        }

        let alerts = advice::alerts(current);
        if !alerts.is_empty() {
            writeln!(f, "\nAlerts:")?;
            for alert in alerts {
                writeln!(f, "  ! {}: {}", alert.title(), alert.advice())?;
            }
        }

        Ok(())
    }
}
