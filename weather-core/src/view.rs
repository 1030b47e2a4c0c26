//! Text rendering of [`ViewState`]. Pure: same state and time zone, same output.

use std::fmt::{Display, Write};

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{Unit, ViewState, WeatherResult};

pub const LOADING_TEXT: &str = "Loading weather data...";
pub const EMPTY_TEXT: &str = "Search for a city or use your location to see the weather.";

/// Render the whole view. `tz` decides how timestamps read.
pub fn render<Tz>(state: &ViewState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    if state.loading {
        out.push_str(LOADING_TEXT);
        out.push('\n');
    }

    if let Some(error) = state.error.as_deref().filter(|e| !e.is_empty()) {
        let _ = writeln!(out, "! {error}");
    }

    match state.visible_weather() {
        Some(weather) => render_panel(&mut out, weather, state.location_access, tz),
        None if out.is_empty() => {
            out.push_str(EMPTY_TEXT);
            out.push('\n');
        }
        None => {}
    }

    out
}

fn render_panel<Tz>(out: &mut String, w: &WeatherResult, location_access: bool, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let unit = w.unit;
    let marker = if location_access { "  (your location)" } else { "" };

    let _ = writeln!(out, "{}{marker}", w.display_name());
    let _ = writeln!(out, "{}", w.observed_at.with_timezone(tz).format("%A, %-d %B %Y"));

    if let Some(c) = &w.condition {
        let _ = writeln!(out, "{} - {}", c.main, c.description);
        let _ = writeln!(out, "Icon: {}", c.icon_url());
    }

    let _ = writeln!(out, "Temperature: {}", format_temperature(w.temperature, unit));
    let _ = writeln!(out, "Feels like: {}", format_temperature(w.feels_like, unit));
    let _ = writeln!(
        out,
        "Wind: {} {}    Humidity: {}%",
        w.wind_speed,
        unit.speed_unit(),
        w.humidity
    );

    let visibility = w.visibility_m.map(format_visibility).unwrap_or_else(|| "n/a".to_string());
    let _ = writeln!(
        out,
        "Pressure: {} hPa    Visibility: {visibility}    Clouds: {}%",
        w.pressure, w.cloud_cover
    );
    let _ = writeln!(
        out,
        "Sunrise: {}    Sunset: {}",
        format_time_of_day(&w.sunrise, tz),
        format_time_of_day(&w.sunset, tz)
    );
}

/// Nearest integer (halves round up) plus the unit symbol, e.g. `18°C`.
pub fn format_temperature(value: f64, unit: Unit) -> String {
    let rounded = (value + 0.5).floor() as i64;
    format!("{rounded}{}", unit.temperature_symbol())
}

/// Meters to kilometers, one decimal.
pub fn format_visibility(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

pub fn format_time_of_day<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}
