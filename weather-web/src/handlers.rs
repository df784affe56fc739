//! Request handlers.
//!
//! Upstream failures of any kind render the generic per-city error page with
//! HTTP 200. Missing parameters and malformed dates fail fast with 400.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use weather_core::{
    DisplayUnits, WeatherError, WeatherQuery, chart, date,
    provider::{self, openweather},
};

use crate::{server::AppState, views};

pub const DEFAULT_UNITS: &str = "metric";

#[derive(Debug, Deserialize)]
pub struct ResultsParams {
    pub city: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalParams {
    pub city: Option<String>,
    pub date: Option<String>,
    pub units: Option<String>,
}

/// GET / - search forms
pub async fn home() -> Html<String> {
    Html(views::home_page(Utc::now().date_naive()))
}

/// GET /results - current weather for a city
pub async fn results(State(state): State<AppState>, Query(params): Query<ResultsParams>) -> Response {
    let Some(city) = non_empty(params.city) else {
        return bad_request("The 'city' parameter is required.");
    };
    let query = match WeatherQuery::new(city, units_or_default(params.units), None) {
        Ok(q) => q,
        Err(e) => return bad_request(&e.to_string()),
    };

    tracing::info!(city = %query.city, units = %query.units, "Current weather requested");

    match provider::current_weather(state.weather.as_ref(), &query.city, &query.units).await {
        Ok(weather) => Html(views::results_page(
            &weather,
            DisplayUnits::resolve(&query.units),
            Utc::now().date_naive(),
        ))
        .into_response(),
        Err(e) => upstream_failure(&query.city, &e),
    }
}

/// GET /historical_results - one past day for a city, with min/max and a chart
pub async fn historical_results(
    State(state): State<AppState>,
    Query(params): Query<HistoricalParams>,
) -> Response {
    let Some(city) = non_empty(params.city) else {
        return bad_request("The 'city' parameter is required.");
    };
    let Some(date_str) = non_empty(params.date) else {
        return bad_request("The 'date' parameter is required.");
    };
    let query = match WeatherQuery::new(city, units_or_default(params.units), Some(date_str.as_str())) {
        Ok(q) => q,
        Err(e) => return bad_request(&e.to_string()),
    };
    let Some(day) = query.date else {
        return bad_request("The 'date' parameter is required.");
    };

    tracing::info!(city = %query.city, date = %date_str, units = %query.units, "Historical weather requested");

    let point = match state.geocoder.resolve(&query.city).await {
        Ok(Some(point)) => point,
        Ok(None) => {
            return upstream_failure(&query.city, &WeatherError::LocationNotFound(query.city.clone()));
        }
        Err(e) => return upstream_failure(&query.city, &e),
    };

    match provider::historical_weather(state.weather.as_ref(), &query.city, point, day, &query.units).await {
        Ok(weather) => Html(views::historical_page(
            &weather,
            &query.units,
            DisplayUnits::resolve(&query.units),
        ))
        .into_response(),
        Err(e) => upstream_failure(&query.city, &e),
    }
}

/// GET /graph/{lat}/{lon}/{units}/{date} - PNG chart of the day's hourly temperatures
pub async fn graph(
    State(state): State<AppState>,
    Path((lat, lon, units, date_str)): Path<(f64, f64, String, String)>,
) -> Response {
    if !lat.is_finite() || !lon.is_finite() {
        return (StatusCode::BAD_REQUEST, "Coordinates must be finite numbers.").into_response();
    }

    let day = match date::parse_date(&date_str) {
        Ok(d) => d,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let fetched = match state
        .weather
        .fetch_historical(lat, lon, &units, date::utc_midnight_timestamp(day))
        .await
        .and_then(|json| openweather::parse_historical(&json))
    {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::warn!(lat, lon, date = %date_str, "Chart data unavailable: {}", e);
            return (StatusCode::BAD_GATEWAY, "Could not retrieve weather data for this chart.")
                .into_response();
        }
    };

    if fetched.hourly.is_empty() {
        tracing::warn!(lat, lon, date = %date_str, "Chart data unavailable: {}", WeatherError::EmptyDataset);
        return (StatusCode::BAD_GATEWAY, "No hourly data for this day.").into_response();
    }

    let (x, y) = chart::hourly_series(&fetched.hourly);
    let y_label = format!("Temperature ({})", DisplayUnits::resolve(&units).temperature);

    // Rasterising and PNG encoding are CPU-bound.
    let rendered =
        tokio::task::spawn_blocking(move || chart::render_line_chart(&x, &y, "Hour", &y_label)).await;

    match rendered {
        Ok(Ok(png)) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render chart: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render chart.").into_response()
        }
        Err(e) => {
            tracing::error!("Chart render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render chart.").into_response()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn units_or_default(units: Option<String>) -> String {
    non_empty(units).unwrap_or_else(|| DEFAULT_UNITS.to_string())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(views::bad_request_page(message))).into_response()
}

fn upstream_failure(city: &str, err: &WeatherError) -> Response {
    if err.is_upstream() {
        tracing::warn!(city, "Weather lookup failed: {}", err);
    } else {
        tracing::error!(city, "Weather lookup failed unexpectedly: {}", err);
    }
    Html(views::error_page(city)).into_response()
}
