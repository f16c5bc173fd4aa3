// mapty-lib/src/workout.rs
use crate::coords::Coords;
use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of trailing timestamp digits kept in a workout id.
const ID_DIGITS: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkoutError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("Invalid workout location: {0}")]
    InvalidCoords(Coords),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }

    /// Capitalised name used in descriptions ("Running").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    /// Style class of the map popup for this type.
    #[must_use]
    pub const fn popup_class(self) -> &'static str {
        match self {
            Self::Running => "running-popup",
            Self::Cycling => "cycling-popup",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Cycling,
            Self::Cycling => Self::Running,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Cycling => write!(f, "cycling"),
        }
    }
}

/// Variant-specific data. Derived metrics are stored next to the raw input
/// so they survive a storage round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence: f64,
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        speed: f64,
    },
}

/// One logged activity. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    date: DateTime<Utc>,
    id: String,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(flatten)]
    kind: WorkoutKind,
    description: String,
}

impl Workout {
    /// Builds a running record; pace is `duration / distance` (min/km).
    /// # Errors
    /// `WorkoutError` if distance, duration or cadence is not a positive finite number,
    /// or the pace overflows.
    pub fn running(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, WorkoutError> {
        check_base(coords, distance, duration)?;
        check_positive("cadence", cadence)?;
        // Non-finite floats serialize as `null` and would poison the stored list.
        let pace = duration / distance;
        check_finite("pace", pace)?;
        let kind = WorkoutKind::Running { cadence, pace };
        Ok(Self::assemble(id, date, coords, distance, duration, kind))
    }

    /// Builds a cycling record; speed is `distance / (duration / 60)` (km/h).
    /// Elevation gain may be zero or negative.
    /// # Errors
    /// `WorkoutError` if distance or duration is not a positive finite number,
    /// elevation gain is not finite, or the speed overflows.
    pub fn cycling(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, WorkoutError> {
        check_base(coords, distance, duration)?;
        check_finite("elevation gain", elevation_gain)?;
        let speed = distance / (duration / 60.0);
        check_finite("speed", speed)?;
        let kind = WorkoutKind::Cycling {
            elevation_gain,
            speed,
        };
        Ok(Self::assemble(id, date, coords, distance, duration, kind))
    }

    fn assemble(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Self {
        let workout_type = match kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        };
        Self {
            description: describe(workout_type, &date),
            date,
            id,
            coords,
            distance,
            duration,
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    /// Kilometres.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Minutes.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        match self.kind {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }

    /// The derived metric with its unit: pace (min/km) or speed (km/h).
    pub fn derived_metric(&self) -> (f64, &'static str) {
        match self.kind {
            WorkoutKind::Running { pace, .. } => (pace, "min/km"),
            WorkoutKind::Cycling { speed, .. } => (speed, "km/h"),
        }
    }

    /// The raw type-specific input with its unit: cadence (spm) or elevation gain (m).
    pub fn type_metric(&self) -> (f64, &'static str) {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => (cadence, "spm"),
            WorkoutKind::Cycling { elevation_gain, .. } => (elevation_gain, "m"),
        }
    }
}

/// "Running on March 14", using the local calendar day of `date`.
pub fn describe(workout_type: WorkoutType, date: &DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!(
        "{} on {} {}",
        workout_type.label(),
        MONTHS[local.month0() as usize],
        local.day()
    )
}

/// Last ten digits of the Unix millisecond timestamp.
pub fn id_from_timestamp(date: DateTime<Utc>) -> String {
    let millis = date.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(ID_DIGITS);
    millis[start..].to_string()
}

fn check_base(coords: Coords, distance: f64, duration: f64) -> Result<(), WorkoutError> {
    if !coords.is_valid() {
        return Err(WorkoutError::InvalidCoords(coords));
    }
    check_positive("distance", distance)?;
    check_positive("duration", duration)
}

fn check_finite(field: &'static str, value: f64) -> Result<(), WorkoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WorkoutError::NotFinite { field, value })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), WorkoutError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(WorkoutError::NotPositive { field, value })
    }
}
