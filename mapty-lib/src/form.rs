// mapty-lib/src/form.rs
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::workout::WorkoutType;

/// How long a hidden form keeps its slot before the layout collapses.
pub const HIDE_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Input should be positive numbers!")]
    InvalidInput { fields: Vec<FormField> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Type,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Distance => "Distance",
            Self::Duration => "Duration",
            Self::Cadence => "Cadence",
            Self::Elevation => "Elev Gain",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Type => "",
            Self::Distance => "km",
            Self::Duration => "min",
            Self::Cadence => "step/min",
            Self::Elevation => "meters",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormVisibility {
    Hidden,
    Visible,
    /// Hidden, but still holding its place until the transition ends.
    Collapsing { since: Instant },
}

/// Validated values ready to become a workout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorkoutInput {
    Running {
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutForm {
    workout_type: WorkoutType,
    distance: String,
    duration: String,
    cadence: String,
    elevation: String,
    focused: FormField,
    visibility: FormVisibility,
    invalid_fields: Vec<FormField>,
}

impl Default for WorkoutForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutForm {
    pub const fn new() -> Self {
        Self {
            workout_type: WorkoutType::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
            focused: FormField::Distance,
            visibility: FormVisibility::Hidden,
            invalid_fields: Vec::new(),
        }
    }

    /// Shows the form with the cursor in the distance field.
    pub fn show(&mut self) {
        self.visibility = FormVisibility::Visible;
        self.focused = FormField::Distance;
    }

    /// Clears every input and hides the form.
    pub fn hide(&mut self, now: Instant) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
        self.invalid_fields.clear();
        self.focused = FormField::Distance;
        self.visibility = FormVisibility::Collapsing { since: now };
    }

    /// Ends the hide transition once it has run its course.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let FormVisibility::Collapsing { since } = self.visibility {
            if now.saturating_duration_since(since) >= HIDE_TRANSITION {
                self.visibility = FormVisibility::Hidden;
                return false;
            }
            return true;
        }
        false
    }

    pub const fn visibility(&self) -> FormVisibility {
        self.visibility
    }

    pub const fn is_visible(&self) -> bool {
        matches!(self.visibility, FormVisibility::Visible)
    }

    pub const fn is_collapsing(&self) -> bool {
        matches!(self.visibility, FormVisibility::Collapsing { .. })
    }

    pub const fn workout_type(&self) -> WorkoutType {
        self.workout_type
    }

    pub fn set_type(&mut self, workout_type: WorkoutType) {
        if self.workout_type == workout_type {
            return;
        }
        self.workout_type = workout_type;
        // Keep the cursor on the field that took the place of the hidden one.
        self.focused = match self.focused {
            FormField::Cadence | FormField::Elevation => self.type_field(),
            other => other,
        };
    }

    /// Swaps the cadence and elevation rows.
    pub fn toggle_type(&mut self) {
        self.set_type(self.workout_type.toggled());
    }

    /// The type-specific input shown for the current type.
    pub const fn type_field(&self) -> FormField {
        match self.workout_type {
            WorkoutType::Running => FormField::Cadence,
            WorkoutType::Cycling => FormField::Elevation,
        }
    }

    pub fn visible_fields(&self) -> [FormField; 4] {
        [
            FormField::Type,
            FormField::Distance,
            FormField::Duration,
            self.type_field(),
        ]
    }

    pub const fn focused(&self) -> FormField {
        self.focused
    }

    pub fn focus(&mut self, field: FormField) {
        if self.visible_fields().contains(&field) {
            self.focused = field;
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.focused = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn input(&self, field: FormField) -> &str {
        match field {
            FormField::Type => match self.workout_type {
                WorkoutType::Running => "Running",
                WorkoutType::Cycling => "Cycling",
            },
            FormField::Distance => &self.distance,
            FormField::Duration => &self.duration,
            FormField::Cadence => &self.cadence,
            FormField::Elevation => &self.elevation,
        }
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Type => None,
            FormField::Distance => Some(&mut self.distance),
            FormField::Duration => Some(&mut self.duration),
            FormField::Cadence => Some(&mut self.cadence),
            FormField::Elevation => Some(&mut self.elevation),
        }
    }

    pub fn set_input(&mut self, field: FormField, value: &str) {
        if let Some(input) = self.input_mut(field) {
            *input = value.to_string();
        }
    }

    /// Types into the focused text field. Ignored on the type selector.
    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let focused = self.focused;
        if let Some(input) = self.input_mut(focused) {
            input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        let focused = self.focused;
        if let Some(input) = self.input_mut(focused) {
            input.pop();
        }
    }

    /// Fields rejected by the last validation.
    pub fn invalid_fields(&self) -> &[FormField] {
        &self.invalid_fields
    }

    /// Checks the inputs for the selected type.
    ///
    /// Running requires distance, duration and cadence to be finite and positive.
    /// Cycling requires all three to be finite but only distance and duration
    /// to be positive; elevation gain may be zero or negative.
    /// # Errors
    /// `FormError::InvalidInput` naming the offending fields. The inputs are kept.
    pub fn validate(&mut self) -> Result<WorkoutInput, FormError> {
        let distance = parse_numeric(&self.distance);
        let duration = parse_numeric(&self.duration);
        let third_field = self.type_field();
        let third = parse_numeric(self.input(third_field));

        let mut invalid = Vec::new();
        for (field, value) in [
            (FormField::Distance, distance),
            (FormField::Duration, duration),
        ] {
            if !is_positive_finite(value) {
                invalid.push(field);
            }
        }
        let third_ok = match self.workout_type {
            WorkoutType::Running => is_positive_finite(third),
            WorkoutType::Cycling => third.is_finite(),
        };
        if !third_ok {
            invalid.push(third_field);
        }

        if !invalid.is_empty() {
            self.invalid_fields.clone_from(&invalid);
            return Err(FormError::InvalidInput { fields: invalid });
        }
        self.invalid_fields.clear();

        Ok(match self.workout_type {
            WorkoutType::Running => WorkoutInput::Running {
                distance,
                duration,
                cadence: third,
            },
            WorkoutType::Cycling => WorkoutInput::Cycling {
                distance,
                duration,
                elevation_gain: third,
            },
        })
    }
}

/// Numeric coercion of a text field: blank is 0, anything unparsable is NaN.
/// Unsigned `0x`, `0o` and `0b` integer literals are read in their radix.
pub fn parse_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_precision_loss)]
fn parse_radix_literal(text: &str) -> Option<f64> {
    let (prefix, digits) = (text.get(..2)?, text.get(2..)?);
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    // `from_str_radix` would accept a sign here, a literal must not have one.
    if digits.starts_with(['+', '-']) {
        return Some(f64::NAN);
    }
    Some(u128::from_str_radix(digits, radix).map_or(f64::NAN, |value| value as f64))
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
