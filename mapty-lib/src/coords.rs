// mapty-lib/src/coords.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordsError {
    #[error("Expected coordinates as 'lat,lng', got '{0}'")]
    Format(String),
    #[error("Invalid number in coordinates: '{0}'")]
    Number(String),
    #[error("Coordinates out of range: latitude must be within ±90 and longitude within ±180 (got {lat}, {lng})")]
    OutOfRange { lat: f64, lng: f64 },
}

/// A geographic point. Persisted as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validating constructor used for anything typed in by the user.
    /// # Errors
    /// `CoordsError::OutOfRange` for non-finite or out-of-range values.
    pub fn checked(lat: f64, lng: f64) -> Result<Self, CoordsError> {
        let coords = Self::new(lat, lng);
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(CoordsError::OutOfRange { lat, lng })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Linear interpolation towards `other`, `t` in [0, 1].
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(value: Coords) -> Self {
        [value.lat, value.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

impl FromStr for Coords {
    type Err = CoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat_str, lng_str) = s
            .split_once(',')
            .ok_or_else(|| CoordsError::Format(s.to_string()))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| CoordsError::Number(part.trim().to_string()))
        };
        Self::checked(parse(lat_str)?, parse(lng_str)?)
    }
}
