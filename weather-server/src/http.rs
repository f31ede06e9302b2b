//! HTTP surface of the forecast pipeline.
//!
//! Every response carries permissive cross-origin headers. Failures of any kind are answered
//! with `400 { "error": message }`.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cassava_weather_core::{
    ForecastError, ForecastResult, ForecastService,
    presets::{PRESET_LOCATIONS, PresetLocation},
};
use serde_json::{Value, json};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Client-Info, Apikey";

/// Build the router with all routes and middleware.
pub fn build_router(service: ForecastService) -> Router {
    Router::new()
        .route(
            "/weather_forecast",
            post(forecast).options(preflight).fallback(method_not_allowed),
        )
        // Path used by the hosted deployment the web client was written against.
        .route(
            "/functions/v1/weather_forecast",
            post(forecast).options(preflight).fallback(method_not_allowed),
        )
        .route("/locations", get(locations).fallback(method_not_allowed))
        .route("/health", get(health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, service: ForecastService) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr, "weather forecast endpoint listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn forecast(
    State(service): State<ForecastService>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ForecastResult>, ApiError> {
    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), error = %rejection, "unreadable request body");
        ForecastError::invalid_request("Request body could not be read")
    })?;

    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ForecastError::invalid_request("Request body must be valid JSON"))?;

    let result = service.forecast_from_body(&body).await?;
    Ok(Json(result))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn locations() -> Json<&'static [PresetLocation]> {
    Json(PRESET_LOCATIONS)
}

async fn health() -> &'static str {
    "ok"
}

async fn method_not_allowed(method: Method) -> ApiError {
    ForecastError::invalid_request(format!("Method {method} not allowed")).into()
}

async fn not_found(uri: Uri) -> ApiError {
    ForecastError::invalid_request(format!("No route for {}", uri.path())).into()
}

/// Converts pipeline failures into the structured failure payload.
#[derive(Debug)]
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            ForecastError::InvalidRequest(_) => {
                warn!(kind = self.0.kind(), error = %self.0, "rejected forecast request")
            }
            _ => error!(kind = self.0.kind(), error = %self.0, "forecast request failed"),
        }

        let body = json!({ "error": self.0.user_message() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
