//! Fixtures shared by unit tests.

use chrono::{DateTime, Utc};

use crate::model::{Condition, Unit, WeatherResult};

/// 2025-10-17 12:00:00 UTC
pub const OBSERVED_AT: i64 = 1_760_702_400;

pub fn at(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

pub fn sample_weather(name: &str, unit: Unit) -> WeatherResult {
    WeatherResult {
        name: name.to_string(),
        country: Some("FR".to_string()),
        observed_at: at(OBSERVED_AT),
        temperature: 17.6,
        feels_like: 17.1,
        humidity: 68,
        pressure: 1016,
        visibility_m: Some(9500),
        cloud_cover: 75,
        wind_speed: 4.12,
        // 05:31 and 16:57 UTC
        sunrise: at(OBSERVED_AT - 23_340),
        sunset: at(OBSERVED_AT + 17_820),
        condition: Some(Condition {
            id: 803,
            main: "Clouds".to_string(),
            description: "broken clouds".to_string(),
            icon: "04d".to_string(),
        }),
        unit,
    }
}
