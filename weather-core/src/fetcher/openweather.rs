use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::ApiConfig,
    error::FetchError,
    model::{Condition, Unit, WeatherQuery, WeatherResult},
};

use super::WeatherFetcher;

/// Client for the OpenWeatherMap `/weather` endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, api_key: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, api_key: api_key.into(), http }
    }

    pub fn from_config(api: &ApiConfig, api_key: &str) -> Self {
        Self::new(api.base_url.clone(), api_key)
    }

    fn query_params(&self, query: &WeatherQuery, unit: Unit) -> Vec<(&'static str, String)> {
        let mut params = match query {
            WeatherQuery::City { name } => vec![("q", name.clone())],
            WeatherQuery::Coords { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("units", unit.as_query_str().to_string()));
        params.push(("appid", self.api_key.clone()));
        params
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, query: &WeatherQuery, unit: Unit) -> Result<WeatherResult, FetchError> {
        let url = format!("{}/weather", self.base_url);
        debug!(%query, %unit, "requesting current weather");

        let res = self.http.get(&url).query(&self.query_params(query, unit)).send().await?;

        // Error payloads come with a non-2xx status but still carry `cod`/`message`,
        // so the body is decoded regardless of status.
        let status = res.status();
        let body = res.text().await?;

        parse_current(&body, unit).inspect_err(|err| {
            warn!(%status, error = %err, body = %truncate_body(&body), "weather request failed");
        })
    }
}

/// Decode a `/weather` response body.
fn parse_current(body: &str, unit: Unit) -> Result<WeatherResult, FetchError> {
    let envelope: OwEnvelope = serde_json::from_str(body)?;

    if let Some(code) = envelope.cod.as_ref().filter(|c| !c.is_ok()) {
        return Err(FetchError::Api {
            code: code.to_string(),
            message: envelope.message_text().unwrap_or_else(|| format!("Request failed ({code})")),
        });
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let condition = parsed.weather.into_iter().next().map(|w| Condition {
        id: w.id,
        main: w.main,
        description: w.description,
        icon: w.icon,
    });

    Ok(WeatherResult {
        name: parsed.name,
        country: parsed.sys.country,
        observed_at: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        visibility_m: parsed.visibility,
        cloud_cover: parsed.clouds.map(|c| c.all).unwrap_or_default(),
        wind_speed: parsed.wind.speed,
        sunrise: unix_to_utc(parsed.sys.sunrise).unwrap_or_default(),
        sunset: unix_to_utc(parsed.sys.sunset).unwrap_or_default(),
        condition,
        unit,
    })
}

/// `cod` is a number on success and usually a string on failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_ok(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s.trim() == "200",
        }
    }
}

impl std::fmt::Display for OwCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwCode::Number(n) => write!(f, "{n}"),
            OwCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
}

impl OwEnvelope {
    fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    visibility: Option<u32>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: Option<OwClouds>,
    sys: OwSys,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
