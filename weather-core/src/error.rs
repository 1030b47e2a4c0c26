//! Error types for location lookup, API access, and what the user sees.

/// Failure of the location capability.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location is not supported on this device")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single weather API request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The API answered but rejected the request (`cod != 200`).
    #[error("{message}")]
    Api { code: String, message: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// User-facing error taxonomy; `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherError {
    #[error("Geolocation is not supported on this device. Search for a city instead.")]
    LocationUnsupported,
    #[error("Unable to access your location. Please allow location access or search for a city.")]
    LocationDenied,
    #[error("{0}")]
    ApiDomain(String),
    #[error("Something went wrong. Please try again.")]
    NetworkFailure,
}

impl From<LocationError> for WeatherError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => WeatherError::LocationUnsupported,
            LocationError::PermissionDenied
            | LocationError::Timeout
            | LocationError::Unavailable(_) => WeatherError::LocationDenied,
        }
    }
}

impl From<FetchError> for WeatherError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Api { message, .. } => WeatherError::ApiDomain(message),
            FetchError::Network(_) | FetchError::Decode(_) => WeatherError::NetworkFailure,
        }
    }
}
