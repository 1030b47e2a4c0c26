//! Device location lookup.
//!
//! A terminal has no geolocation prompt, so the "platform capability" is one of:
//! an IP geolocation service, coordinates from config, or nothing at all.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    config::{LocationConfig, LocationProvider},
    error::LocationError,
    model::Coordinates,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Single-shot "where am I" lookup. Exactly one attempt per call.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self) -> Result<Coordinates, LocationError>;
}

/// Approximate position from the caller's public IP (ip-api.com response shape).
#[derive(Debug, Clone)]
pub struct IpLocationResolver {
    lookup_url: String,
    http: Client,
}

impl IpLocationResolver {
    pub fn new(lookup_url: impl Into<String>) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(Self { lookup_url: lookup_url.into(), http })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationResolver for IpLocationResolver {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let res = self.http.get(&self.lookup_url).send().await.map_err(|e| {
            warn!(error = %e, "geolocation request failed");
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Unavailable(e.to_string())
            }
        })?;

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(format!("bad geolocation response: {e}")))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or(body.status);
            warn!(%reason, "geolocation service refused lookup");
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                info!(lat, lon, "resolved location from IP");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Unavailable("response carried no coordinates".into())),
        }
    }
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationResolver(pub Coordinates);

#[async_trait]
impl LocationResolver for FixedLocationResolver {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Location capability that is absent, or that the user turned down.
#[derive(Debug, Clone, Copy)]
pub enum DisabledLocationResolver {
    Unsupported,
    Denied,
}

#[async_trait]
impl LocationResolver for DisabledLocationResolver {
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        match self {
            DisabledLocationResolver::Unsupported => Err(LocationError::Unsupported),
            DisabledLocationResolver::Denied => Err(LocationError::PermissionDenied),
        }
    }
}

/// Build the resolver selected in config.
pub fn resolver_from_config(
    config: &LocationConfig,
) -> Result<Box<dyn LocationResolver>, LocationError> {
    let boxed: Box<dyn LocationResolver> = match config.provider {
        LocationProvider::Ip => Box::new(IpLocationResolver::new(config.lookup_url.clone())?),
        LocationProvider::Fixed => {
            let at = config.fixed_coordinates().ok_or_else(|| {
                LocationError::Unavailable(
                    "location provider is \"fixed\" but latitude/longitude are not set".into(),
                )
            })?;
            Box::new(FixedLocationResolver(at))
        }
        LocationProvider::Disabled => Box::new(DisabledLocationResolver::Unsupported),
        LocationProvider::Denied => Box::new(DisabledLocationResolver::Denied),
    };

    Ok(boxed)
}
