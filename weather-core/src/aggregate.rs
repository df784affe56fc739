//! Daily extremes over hourly samples.

use crate::{
    error::{Result, WeatherError},
    model::HourlySample,
};

pub fn min_temp(hourly: &[HourlySample]) -> Result<f64> {
    hourly
        .iter()
        .map(|s| s.temperature)
        .reduce(f64::min)
        .ok_or(WeatherError::EmptyDataset)
}

pub fn max_temp(hourly: &[HourlySample]) -> Result<f64> {
    hourly
        .iter()
        .map(|s| s.temperature)
        .reduce(f64::max)
        .ok_or(WeatherError::EmptyDataset)
}
