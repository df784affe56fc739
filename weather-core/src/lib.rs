//! Core library for the weather web app.
//!
//! This crate defines:
//! - Configuration handling
//! - Upstream clients for OpenWeather and the Nominatim geocoder
//! - Domain models, unit resolution, date handling and daily aggregation
//! - PNG line charts of hourly temperatures
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod date;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod units;

pub use config::Config;
pub use error::WeatherError;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use model::{CurrentWeather, GeoPoint, HistoricalWeather, HourlySample, WeatherQuery};
pub use provider::{WeatherSource, openweather::OpenWeatherClient};
pub use units::DisplayUnits;
