use crate::{
    Config,
    date,
    error::{Result, WeatherError},
    model::{CurrentWeather, GeoPoint, HistoricalWeather},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// Upstream source of current and historical weather, as raw JSON.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str, units: &str) -> Result<Value>;

    async fn fetch_historical(&self, lat: f64, lon: f64, units: &str, timestamp: i64) -> Result<Value>;
}

/// Current conditions for `city`.
pub async fn current_weather(source: &dyn WeatherSource, city: &str, units: &str) -> Result<CurrentWeather> {
    let json = source.fetch_current(city, units).await?;
    openweather::parse_current(&json)
}

/// Conditions at midnight UTC of `day` plus that day's hourly extremes.
pub async fn historical_weather(
    source: &dyn WeatherSource,
    location: &str,
    point: GeoPoint,
    day: NaiveDate,
    units: &str,
) -> Result<HistoricalWeather> {
    let ts = date::utc_midnight_timestamp(day);
    let json = source
        .fetch_historical(point.latitude, point.longitude, units, ts)
        .await?;
    let fetched = openweather::parse_historical(&json)?;
    HistoricalWeather::assemble(location, day, point, fetched)
}

/// Shared HTTP client with the configured timeout and user agent.
pub fn http_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Send a request and read its JSON body, retrying exactly once if either
/// step times out.
pub(crate) async fn fetch_json(request: RequestBuilder) -> Result<Value> {
    let retry = request.try_clone();

    let (status, body) = match send_and_read(request).await {
        Err(WeatherError::Timeout) => {
            let Some(retry) = retry else {
                return Err(WeatherError::Timeout);
            };
            tracing::debug!("Upstream request timed out, retrying once");
            send_and_read(retry).await?
        }
        other => other?,
    };

    if !status.is_success() {
        return Err(WeatherError::UpstreamStatus {
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| WeatherError::SchemaMismatch(format!("body is not JSON: {e}")))
}

async fn send_and_read(request: RequestBuilder) -> Result<(StatusCode, String)> {
    let res = request.send().await.map_err(request_error)?;
    let status = res.status();
    let body = res.text().await.map_err(request_error)?;
    Ok((status, body))
}

fn request_error(e: reqwest::Error) -> WeatherError {
    if e.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::UpstreamRequest(e)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
