//! `weather configure`: interactive prompts that write the config file.

use std::path::Path;

use anyhow::Result;
use inquire::{CustomType, Password, PasswordDisplayMode, Select};
use weather_core::{Config, Coordinates, LocationProvider, Unit};

pub fn run(mut config: Config, path: &Path) -> Result<()> {
    let has_key = config.api_key().is_ok();

    let mut key_prompt = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if has_key {
        key_prompt = key_prompt.with_help_message("Leave empty to keep the current key");
    }

    let key = key_prompt.prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    let units = vec![Unit::Metric, Unit::Imperial];
    let start = units.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", units).with_starting_cursor(start).prompt()?;

    let providers = LocationProvider::all().to_vec();
    let start = providers.iter().position(|p| *p == config.location.provider).unwrap_or(0);
    let provider = Select::new("Location source:", providers)
        .with_starting_cursor(start)
        .with_help_message("ip: approximate from your IP; fixed: coordinates you enter")
        .prompt()?;

    if provider == LocationProvider::Fixed {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Enter a number, e.g. 48.85")
            .prompt()?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Enter a number, e.g. 2.35")
            .prompt()?;
        config.location.set_fixed(Coordinates::new(lat, lon));
    } else {
        config.location.provider = provider;
    }

    if config.api_key().is_err() {
        println!("Warning: no API key set; `weather` will not be able to fetch data.");
    }

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
