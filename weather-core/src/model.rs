use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::{aggregate, date, error::Result};

/// What a user asked for: a place, a units token and optionally a day.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub city: String,
    pub units: String,
    pub date: Option<NaiveDate>,
}

impl WeatherQuery {
    /// Build a query, validating `date` as `YYYY-MM-DD` when present.
    pub fn new(city: impl Into<String>, units: impl Into<String>, date_str: Option<&str>) -> Result<Self> {
        let date = date_str.map(date::parse_date).transpose()?;
        Ok(Self {
            city: city.into(),
            units: units.into(),
            date,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub city: String,
    pub description: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Sunrise in the city's local time.
    pub sunrise: DateTime<FixedOffset>,
    /// Sunset in the city's local time.
    pub sunset: DateTime<FixedOffset>,
    /// Seconds east of UTC, as reported upstream.
    pub timezone_offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySample {
    pub temperature: f64,
}

/// The conditions reported for one historical timestamp plus the day's hours.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDay {
    pub temperature: f64,
    pub description: String,
    pub hourly: Vec<HourlySample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalWeather {
    pub location: String,
    pub date: NaiveDate,
    pub point: GeoPoint,
    pub temperature: f64,
    pub description: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub hourly: Vec<HourlySample>,
}

impl HistoricalWeather {
    /// Combine a fetched day with where and when it was asked for.
    ///
    /// Fails with `EmptyDataset` when the day carries no hourly samples.
    pub fn assemble(
        location: impl Into<String>,
        date: NaiveDate,
        point: GeoPoint,
        day: HistoricalDay,
    ) -> Result<Self> {
        let min_temp = aggregate::min_temp(&day.hourly)?;
        let max_temp = aggregate::max_temp(&day.hourly)?;

        Ok(Self {
            location: location.into(),
            date,
            point,
            temperature: day.temperature,
            description: day.description,
            min_temp,
            max_temp,
            hourly: day.hourly,
        })
    }
}
