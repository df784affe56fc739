//! Forward geocoding: place name to coordinates.
//! Uses Nominatim (OpenStreetMap), which needs no API key but does want a
//! descriptive User-Agent.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    Config,
    error::{Result, WeatherError},
    model::GeoPoint,
    provider::fetch_json,
};

const SEARCH_PATH: &str = "/search";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Coordinates of the best match for `place`, or `None` if nothing matched.
    async fn resolve(&self, place: &str) -> Result<Option<GeoPoint>>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

// Nominatim serialises coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(config.geocoder_base_url.clone(), http)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, place: &str) -> Result<Option<GeoPoint>> {
        let req = self
            .http
            .get(format!("{}{SEARCH_PATH}", self.base_url))
            .query(&[("q", place), ("format", "json"), ("limit", "1")]);

        let json = fetch_json(req).await?;
        let places = Vec::<NominatimPlace>::deserialize(&json)
            .map_err(|e| WeatherError::SchemaMismatch(format!("geocoder: {e}")))?;

        let Some(first) = places.into_iter().next() else {
            tracing::debug!(place, "Geocoder returned no match");
            return Ok(None);
        };

        let point = parse_point(&first)?;
        tracing::debug!(place, lat = point.latitude, lon = point.longitude, "Geocoded");
        Ok(Some(point))
    }
}

fn parse_point(place: &NominatimPlace) -> Result<GeoPoint> {
    let coord = |s: &str, what: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| WeatherError::SchemaMismatch(format!("geocoder returned {what} '{s}'")))
    };
    Ok(GeoPoint::new(coord(&place.lat, "latitude")?, coord(&place.lon, "longitude")?))
}
