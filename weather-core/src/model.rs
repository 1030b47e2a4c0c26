use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system used both for the API request and for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Value of the `units` query parameter.
    pub fn as_query_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Unit::Metric => "m/s",
            Unit::Imperial => "mph",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_str())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Unit::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Unit::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A single weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City { name: String },
    Coords { lat: f64, lon: f64 },
}

impl WeatherQuery {
    pub fn city(name: impl AsRef<str>) -> Self {
        WeatherQuery::City { name: name.as_ref().trim().to_string() }
    }

    pub fn coords(at: Coordinates) -> Self {
        WeatherQuery::Coords { lat: at.latitude, lon: at.longitude }
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::City { name } => write!(f, "city '{name}'"),
            WeatherQuery::Coords { lat, lon } => write!(f, "coordinates {lat:.4}, {lon:.4}"),
        }
    }
}

/// Weather condition as reported by the API (`weather[0]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// Normalized current conditions for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    pub name: String,
    pub country: Option<String>,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// hPa
    pub pressure: u32,
    pub visibility_m: Option<u32>,
    pub cloud_cover: u8,
    pub wind_speed: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub condition: Option<Condition>,
    /// Unit system the numbers above are expressed in.
    pub unit: Unit,
}

impl WeatherResult {
    /// "Paris, FR", or just the name when the API gave no country.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(cc) if !cc.is_empty() => format!("{}, {}", self.name, cc),
            _ => self.name.clone(),
        }
    }
}

/// Derived position in the fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything the front end needs to draw itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub weather: Option<WeatherResult>,
    pub unit: Unit,
    /// True when `weather` came from device location rather than a search.
    pub location_access: bool,
    /// Contents of the search field.
    pub query: String,
}

impl ViewState {
    pub fn with_unit(unit: Unit) -> Self {
        Self { unit, ..Self::default() }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.weather.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Weather to show, hidden while a request is in flight.
    pub fn visible_weather(&self) -> Option<&WeatherResult> {
        if self.loading { None } else { self.weather.as_ref() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parse_and_display() {
        assert_eq!("Metric".parse::<Unit>().unwrap(), Unit::Metric);
        assert_eq!(" f ".parse::<Unit>().unwrap(), Unit::Imperial);
        assert_eq!(Unit::Imperial.to_string(), "imperial");

        let err = "kelvin".parse::<Unit>().unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn unit_toggle_and_symbols() {
        assert_eq!(Unit::Metric.toggled(), Unit::Imperial);
        assert_eq!(Unit::Imperial.toggled(), Unit::Metric);
        assert_eq!(Unit::Metric.temperature_symbol(), "°C");
        assert_eq!(Unit::Imperial.speed_unit(), "mph");
    }

    #[test]
    fn city_query_is_trimmed() {
        assert_eq!(
            WeatherQuery::city("  Paris "),
            WeatherQuery::City { name: "Paris".into() }
        );
    }

    #[test]
    fn phase_follows_fields() {
        let mut state = ViewState::default();
        assert_eq!(state.phase(), Phase::Idle);

        state.loading = true;
        assert_eq!(state.phase(), Phase::Loading);

        state.loading = false;
        state.error = Some("city not found".into());
        assert_eq!(state.phase(), Phase::Error);
    }

    #[test]
    fn condition_icon_url() {
        let c = Condition {
            id: 800,
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        };
        assert_eq!(c.icon_url(), "https://openweathermap.org/img/wn/01d@2x.png");
    }
}
