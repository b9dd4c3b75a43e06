use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WidgetError;

/// Query string sent verbatim (URL-encoded) as the `q` parameter.
///
/// Either a free-text city or a `"lat,lon"` pair; no structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    /// Lets the API resolve the caller's location from their IP address.
    pub const AUTO_IP: &'static str = "auto:ip";

    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn from_position(position: Position) -> Self {
        Self(format!("{},{}", position.latitude, position.longitude))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadLocation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadCurrent {
    pub temp_c: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub pressure_mb: f64,
}

/// Body of `current.json`. Both halves must be present before rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherPayload {
    #[serde(default)]
    pub location: Option<PayloadLocation>,
    #[serde(default)]
    pub current: Option<PayloadCurrent>,
}

/// A current-conditions payload that passed its presence checks.
#[derive(Debug, Clone, Copy)]
pub struct ValidCurrent<'a> {
    pub location: &'a PayloadLocation,
    pub current: &'a PayloadCurrent,
}

impl CurrentWeatherPayload {
    pub fn validate(&self) -> Result<ValidCurrent<'_>, WidgetError> {
        match (&self.location, &self.current) {
            (Some(location), Some(current)) => Ok(ValidCurrent { location, current }),
            _ => Err(WidgetError::InvalidPayloadShape),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub avgtemp_c: f64,
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avghumidity: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day: DaySummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastBlock {
    #[serde(default)]
    pub forecastday: Option<Vec<ForecastDay>>,
}

/// Body of `forecast.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub forecast: Option<ForecastBlock>,
}

/// Forecast days of a payload that passed its presence checks, in API order.
#[derive(Debug, Clone, Copy)]
pub struct ValidForecast<'a> {
    pub days: &'a [ForecastDay],
}

impl ForecastPayload {
    pub fn validate(&self) -> Result<ValidForecast<'_>, WidgetError> {
        self.forecast
            .as_ref()
            .and_then(|block| block.forecastday.as_deref())
            .map(|days| ValidForecast { days })
            .ok_or(WidgetError::InvalidPayloadShape)
    }
}

/// One entry of `search.json`. Other fields the API returns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
}

impl CitySuggestion {
    /// Text that goes back into the input field when the entry is picked.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}
