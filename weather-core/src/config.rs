use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Coordinates, Unit};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_LOOKUP_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";
pub const DEFAULT_ERROR_DISPLAY_SECS: u64 = 3;

/// Weather API endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), api_key: None }
    }
}

/// Where device coordinates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationProvider {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// Fixed `latitude`/`longitude` from this file.
    Fixed,
    /// No location capability at all.
    Disabled,
    /// The user declined location access.
    Denied,
}

impl LocationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationProvider::Ip => "ip",
            LocationProvider::Fixed => "fixed",
            LocationProvider::Disabled => "disabled",
            LocationProvider::Denied => "denied",
        }
    }

    pub const fn all() -> &'static [LocationProvider] {
        &[
            LocationProvider::Ip,
            LocationProvider::Fixed,
            LocationProvider::Disabled,
            LocationProvider::Denied,
        ]
    }
}

impl std::fmt::Display for LocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub provider: LocationProvider,
    pub lookup_url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationProvider::default(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

impl LocationConfig {
    pub fn fixed_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    pub fn set_fixed(&mut self, at: Coordinates) {
        self.provider = LocationProvider::Fixed;
        self.latitude = Some(at.latitude);
        self.longitude = Some(at.longitude);
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// units = "metric"
///
/// [api]
/// api_key = "..."
///
/// [location]
/// provider = "fixed"
/// latitude = 48.85
/// longitude = 2.35
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit system the session starts with.
    pub units: Unit,

    /// How long an error banner stays up.
    pub error_display_secs: u64,

    pub api: ApiConfig,

    pub location: LocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: Unit::default(),
            error_display_secs: DEFAULT_ERROR_DISPLAY_SECS,
            api: ApiConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured for OpenWeather.\n\
                     Hint: run `weather configure` or pass --api-key / set OPENWEATHER_API_KEY."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api.api_key = Some(api_key);
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_secs(self.error_display_secs)
    }
}
