// mapty-lib/src/geolocation.rs
use thiserror::Error;
use tracing::debug;

use crate::coords::Coords;

/// Environment variable consulted before the config file ("lat,lng").
pub const POSITION_ENV_VAR: &str = "MAPTY_POSITION";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Position unavailable: set `home_location` in the config file or MAPTY_POSITION")]
    Unavailable,
    #[error("Position request denied: {0}")]
    Denied(String),
}

/// Source of the user's current position. Asked once at startup; no retries.
pub trait Geolocation {
    fn current_position(&self) -> Result<Coords, GeolocationError>;
}

/// Position taken from `MAPTY_POSITION` or, failing that, the configured home location.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocation {
    env_value: Option<String>,
    home_location: Option<Coords>,
}

impl ConfiguredGeolocation {
    pub fn new(home_location: Option<Coords>) -> Self {
        Self {
            env_value: std::env::var(POSITION_ENV_VAR).ok(),
            home_location,
        }
    }

    /// Constructor that ignores the process environment.
    pub fn from_parts(env_value: Option<String>, home_location: Option<Coords>) -> Self {
        Self {
            env_value,
            home_location,
        }
    }
}

impl Geolocation for ConfiguredGeolocation {
    fn current_position(&self) -> Result<Coords, GeolocationError> {
        if let Some(raw) = self.env_value.as_deref().filter(|v| !v.trim().is_empty()) {
            debug!(value = raw, "Using position from {}", POSITION_ENV_VAR);
            return raw
                .parse::<Coords>()
                .map_err(|e| GeolocationError::Denied(e.to_string()));
        }
        match self.home_location {
            Some(home) if home.is_valid() => Ok(home),
            Some(home) => Err(GeolocationError::Denied(format!(
                "configured home location {home} is out of range"
            ))),
            None => Err(GeolocationError::Unavailable),
        }
    }
}

/// Always answers with the same result.
#[derive(Debug, Clone)]
pub struct FixedGeolocation(pub Result<Coords, GeolocationError>);

impl FixedGeolocation {
    pub const fn at(coords: Coords) -> Self {
        Self(Ok(coords))
    }

    pub const fn unavailable() -> Self {
        Self(Err(GeolocationError::Unavailable))
    }
}

impl Geolocation for FixedGeolocation {
    fn current_position(&self) -> Result<Coords, GeolocationError> {
        self.0.clone()
    }
}
