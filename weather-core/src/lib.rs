//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration (API endpoint/key, units, location source)
//! - Location resolution and the OpenWeather fetcher
//! - The weather-fetch state machine ([`WeatherApp`]) and its [`ViewState`]
//! - Plain-text rendering of the view
//!
//! It is used by `weather-cli`, but can also back other front ends.

pub mod app;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod model;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::{AppSettings, Intent, WeatherApp};
pub use config::{ApiConfig, Config, LocationConfig, LocationProvider};
pub use error::{FetchError, LocationError, WeatherError};
pub use fetcher::{OpenWeatherFetcher, WeatherFetcher};
pub use location::{LocationResolver, resolver_from_config};
pub use model::{Condition, Coordinates, Phase, Unit, ViewState, WeatherQuery, WeatherResult};
