//! Mapping from a units token (`imperial`, `metric`, `kelvin`) to display units.
//!
//! Every function here is total: unknown tokens fall back to Kelvin for
//! temperature and mph for wind.

/// Shorthand letter shown next to temperatures.
pub fn temperature_letter(units: &str) -> char {
    match units {
        "imperial" => 'F',
        "metric" => 'C',
        _ => 'K',
    }
}

/// Unit shown next to wind speeds.
pub fn wind_unit(units: &str) -> &'static str {
    match units {
        "metric" | "kelvin" => "m/s",
        _ => "mph",
    }
}

/// Value sent as the upstream `units` parameter.
///
/// OpenWeather calls Kelvin output `standard`.
pub fn upstream_units(units: &str) -> &str {
    match units {
        "kelvin" => "standard",
        other => other,
    }
}

/// Temperature letter and wind unit for one units token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayUnits {
    pub temperature: char,
    pub wind: &'static str,
}

impl DisplayUnits {
    pub fn resolve(units: &str) -> Self {
        Self {
            temperature: temperature_letter(units),
            wind: wind_unit(units),
        }
    }
}
