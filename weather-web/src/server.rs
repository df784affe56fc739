//! Router and server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use weather_core::{
    Config, Geocoder, NominatimGeocoder, OpenWeatherClient, WeatherSource, provider,
};

use crate::handlers;

/// Shared state for HTTP handlers. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherSource>,
}

impl AppState {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherSource>) -> Self {
        Self { geocoder, weather }
    }

    /// Wire the real upstream clients from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = provider::http_client(config).context("Failed to build HTTP client")?;
        let weather = OpenWeatherClient::from_config(config, http.clone())?;
        let geocoder = NominatimGeocoder::from_config(config, http);
        Ok(Self::new(Arc::new(geocoder), Arc::new(weather)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/results", get(handlers::results))
        .route("/historical_results", get(handlers::historical_results))
        .route("/graph/{lat}/{lon}/{units}/{date}", get(handlers::graph))
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(config.bind_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Weather server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Weather server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
