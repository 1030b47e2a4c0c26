use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::{Unit, WeatherQuery, WeatherResult},
};

pub mod openweather;

pub use openweather::OpenWeatherFetcher;

/// Issues one current-weather request. No retries, no caching.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery, unit: Unit) -> Result<WeatherResult, FetchError>;

    async fn fetch_by_city(&self, name: &str, unit: Unit) -> Result<WeatherResult, FetchError> {
        self.fetch(&WeatherQuery::city(name), unit).await
    }

    async fn fetch_by_coords(
        &self,
        lat: f64,
        lon: f64,
        unit: Unit,
    ) -> Result<WeatherResult, FetchError> {
        self.fetch(&WeatherQuery::Coords { lat, lon }, unit).await
    }
}
