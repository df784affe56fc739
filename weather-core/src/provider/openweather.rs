use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Config, date,
    error::{Result, WeatherError},
    model::{CurrentWeather, HistoricalDay, HourlySample},
    units,
};

use super::{WeatherSource, fetch_json};

const CURRENT_PATH: &str = "/data/2.5/weather";
const TIMEMACHINE_PATH: &str = "/data/2.5/onecall/timemachine";

/// Client for the OpenWeather current-weather and time-machine endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        Ok(Self::new(api_key, config.weather_base_url.clone(), http))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self, city: &str, units: &str) -> Result<Value> {
        tracing::debug!(city, units, "Fetching current weather");

        let req = self.http.get(format!("{}{CURRENT_PATH}", self.base_url)).query(&[
            ("appid", self.api_key.as_str()),
            ("q", city),
            ("units", units::upstream_units(units)),
        ]);

        fetch_json(req).await
    }

    async fn fetch_historical(&self, lat: f64, lon: f64, units: &str, timestamp: i64) -> Result<Value> {
        tracing::debug!(lat, lon, units, timestamp, "Fetching historical weather");

        let req = self.http.get(format!("{}{TIMEMACHINE_PATH}", self.base_url)).query(&[
            ("appid", self.api_key.clone()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", units::upstream_units(units).to_string()),
            ("dt", timestamp.to_string()),
        ]);

        fetch_json(req).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    timezone: i32,
    main: OwMain,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwHistoricalCurrent {
    temp: f64,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwTimemachineResponse {
    current: OwHistoricalCurrent,
    hourly: Vec<OwHourly>,
}

/// Shape a `/weather` response into [`CurrentWeather`].
pub fn parse_current(json: &Value) -> Result<CurrentWeather> {
    let parsed = OwCurrentResponse::deserialize(json)
        .map_err(|e| WeatherError::SchemaMismatch(format!("current weather: {e}")))?;

    let local = |ts: i64, what: &str| {
        date::local_time(ts, parsed.timezone).ok_or_else(|| {
            WeatherError::SchemaMismatch(format!(
                "{what} {ts} with timezone offset {} is out of range",
                parsed.timezone
            ))
        })
    };

    Ok(CurrentWeather {
        sunrise: local(parsed.sys.sunrise, "sunrise")?,
        sunset: local(parsed.sys.sunset, "sunset")?,
        description: first_description(&parsed.weather),
        city: parsed.name,
        temperature: parsed.main.temp,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        timezone_offset: parsed.timezone,
    })
}

/// Shape a `/onecall/timemachine` response into a [`HistoricalDay`].
pub fn parse_historical(json: &Value) -> Result<HistoricalDay> {
    let parsed = OwTimemachineResponse::deserialize(json)
        .map_err(|e| WeatherError::SchemaMismatch(format!("historical weather: {e}")))?;

    Ok(HistoricalDay {
        temperature: parsed.current.temp,
        description: first_description(&parsed.current.weather),
        hourly: parsed
            .hourly
            .into_iter()
            .map(|h| HourlySample { temperature: h.temp })
            .collect(),
    })
}

fn first_description(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_json() -> Value {
        json!({
            "name": "Oakland",
            "dt": 1_598_439_600,
            "timezone": -25_200,
            "main": { "temp": 68.5, "feels_like": 67.0, "humidity": 64 },
            "wind": { "speed": 9.17, "deg": 250 },
            "sys": { "country": "US", "sunrise": 1_598_449_020, "sunset": 1_598_496_660 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }]
        })
    }

    #[test]
    fn current_applies_timezone_offset() {
        let cur = parse_current(&current_json()).unwrap();

        assert_eq!(cur.city, "Oakland");
        assert_eq!(cur.description, "clear sky");
        assert_eq!(cur.temperature, 68.5);
        assert_eq!(cur.humidity, 64);
        assert_eq!(cur.wind_speed, 9.17);
        assert_eq!(cur.timezone_offset, -25_200);

        // 13:37 UTC at UTC-7
        assert_eq!(cur.sunrise.format("%H:%M").to_string(), "06:37");
        assert_eq!(cur.sunrise.offset().local_minus_utc(), -25_200);
        assert_eq!(cur.sunrise.timestamp(), 1_598_449_020);
        assert_eq!(cur.sunset.format("%H:%M").to_string(), "19:51");
    }

    #[test]
    fn current_missing_main_is_schema_mismatch() {
        let mut json = current_json();
        json.as_object_mut().unwrap().remove("main");

        let err = parse_current(&json).unwrap_err();
        match err {
            WeatherError::SchemaMismatch(msg) => assert!(msg.contains("main"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn current_error_payload_is_schema_mismatch() {
        let json = json!({ "cod": "404", "message": "city not found" });
        assert!(matches!(parse_current(&json), Err(WeatherError::SchemaMismatch(_))));
    }

    #[test]
    fn current_without_weather_entries_says_unknown() {
        let mut json = current_json();
        json["weather"] = json!([]);
        assert_eq!(parse_current(&json).unwrap().description, "Unknown");
    }

    #[test]
    fn current_rejects_impossible_offset() {
        let mut json = current_json();
        json["timezone"] = json!(200_000);
        assert!(matches!(parse_current(&json), Err(WeatherError::SchemaMismatch(_))));
    }

    #[test]
    fn historical_collects_hourly_temps() {
        let json = json!({
            "lat": 37.8, "lon": -122.27, "timezone": "America/Los_Angeles",
            "current": { "dt": 1_598_400_000, "temp": 17.2, "weather": [{ "description": "haze" }] },
            "hourly": [
                { "dt": 1_598_400_000, "temp": 10.0, "humidity": 80 },
                { "dt": 1_598_403_600, "temp": 25.0, "humidity": 60 },
                { "dt": 1_598_407_200, "temp": 18.0, "humidity": 70 }
            ]
        });

        let day = parse_historical(&json).unwrap();
        assert_eq!(day.temperature, 17.2);
        assert_eq!(day.description, "haze");
        let temps: Vec<f64> = day.hourly.iter().map(|h| h.temperature).collect();
        assert_eq!(temps, vec![10.0, 25.0, 18.0]);
    }

    #[test]
    fn historical_missing_hourly_is_schema_mismatch() {
        let json = json!({ "current": { "temp": 17.2, "weather": [] } });
        assert!(matches!(parse_historical(&json), Err(WeatherError::SchemaMismatch(_))));
    }
}
