//! Core library for the cassava portal weather forecast.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the upstream weather provider (OpenWeather)
//! - The forecast pipeline: validate, fetch, reduce to daily points, normalize
//! - Shared domain models (requests, responses) and the error taxonomy
//!
//! It is used by `cassava-weather-server`, which exposes the pipeline over HTTP and the CLI.

pub mod advice;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod presets;
pub mod provider;
pub mod reduce;
pub mod service;

pub use config::{Config, OpenWeatherConfig, ServerConfig};
pub use error::ForecastError;
pub use model::{Coordinates, CurrentConditions, DailyForecastPoint, ForecastRequest, ForecastResult};
pub use provider::{UpstreamSnapshot, WeatherProvider, openweather::OpenWeatherProvider};
pub use service::ForecastService;
