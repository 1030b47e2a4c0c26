use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use weather_core::{
    AppSettings, Config, Coordinates, LocationProvider, LocationResolver, OpenWeatherFetcher, Unit,
    WeatherApp, resolver_from_config,
};

use crate::{configure, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    #[command(flatten)]
    pub opts: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Per-run overrides on top of the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// OpenWeather API key.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Unit system to start with: metric or imperial.
    #[arg(long, global = true)]
    pub units: Option<Unit>,

    /// Use this latitude as the device location (requires --lon).
    #[arg(long, global = true, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Use this longitude as the device location (requires --lat).
    #[arg(long, global = true, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Behave as if location access was refused.
    #[arg(long, global = true, conflicts_with_all = ["lat", "lon"])]
    pub deny_location: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session (the default).
    Interactive,

    /// Show the weather once and exit.
    Show {
        /// City name; when absent, the device location is used.
        city: Vec<String>,
    },

    /// Configure API key, default units and location source.
    Configure,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.set_api_key(key.clone());
        }
        if let Some(units) = self.units {
            config.units = units;
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.location.set_fixed(Coordinates::new(lat, lon));
        }
        if self.deny_location {
            config.location.provider = LocationProvider::Denied;
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { opts, command } = self;

        let config_path = match &opts.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");

        match command.unwrap_or(Command::Interactive) {
            Command::Configure => configure::run(config, &config_path),
            Command::Show { city } => {
                opts.apply(&mut config);
                let city = Some(city.join(" ")).filter(|c| !c.trim().is_empty());
                session::show(build_app(&config)?, city).await
            }
            Command::Interactive => {
                opts.apply(&mut config);
                session::run(build_app(&config)?).await
            }
        }
    }
}

/// Wire the fetcher and location resolver selected by `config`.
pub fn build_app(config: &Config) -> anyhow::Result<WeatherApp> {
    let api_key = config.api_key()?;
    let fetcher = Arc::new(OpenWeatherFetcher::from_config(&config.api, api_key));

    let locator: Arc<dyn LocationResolver> = Arc::from(
        resolver_from_config(&config.location).context("Failed to set up location lookup")?,
    );

    Ok(WeatherApp::new(fetcher, locator, AppSettings::from(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_joins_multi_word_city() {
        let cli = Cli::try_parse_from(["weather", "show", "New", "York"]).unwrap();
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city.join(" "), "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn overrides_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["weather", "show", "--units", "imperial", "Paris"]).unwrap();

        assert_eq!(cli.opts.units, Some(Unit::Imperial));
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, vec!["Paris".to_string()]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["weather", "--lat", "48.8"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "weather", "--api-key", "KEY", "--units", "imperial", "--lat", "-33.9", "--lon", "18.4",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.opts.apply(&mut config);

        assert_eq!(config.api_key().unwrap(), "KEY");
        assert_eq!(config.units, Unit::Imperial);
        assert_eq!(config.location.provider, LocationProvider::Fixed);
        assert_eq!(config.location.fixed_coordinates(), Some(Coordinates::new(-33.9, 18.4)));
    }

    #[test]
    fn deny_location_override() {
        let cli = Cli::try_parse_from(["weather", "--deny-location", "interactive"]).unwrap();

        let mut config = Config::default();
        cli.opts.apply(&mut config);
        assert_eq!(config.location.provider, LocationProvider::Denied);
    }

    #[test]
    fn build_app_needs_api_key() {
        let err = build_app(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }
}
