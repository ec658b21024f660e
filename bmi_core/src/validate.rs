//! Validation of raw form input.
//!
//! Fields are checked in form order (name, weight, height) and the first
//! failure is reported. Nothing is computed or stored for rejected input.

use crate::{Measurement, ValidationError};

pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_HEIGHT_M: f64 = 3.0;

/// Check raw text fields and produce a typed [`Measurement`]
pub fn validate(
    name: &str,
    weight: &str,
    height: &str,
) -> Result<Measurement, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let weight_kg = parse_number(weight)
        .ok_or_else(|| ValidationError::NonNumericWeight(weight.to_string()))?;
    if weight_kg <= 0.0 || weight_kg > MAX_WEIGHT_KG {
        return Err(ValidationError::OutOfRangeWeight(weight_kg));
    }

    let height_m = parse_number(height)
        .ok_or_else(|| ValidationError::NonNumericHeight(height.to_string()))?;
    if height_m <= 0.0 || height_m > MAX_HEIGHT_M {
        return Err(ValidationError::OutOfRangeHeight(height_m));
    }

    Ok(Measurement {
        name: name.to_string(),
        weight_kg,
        height_m,
    })
}

/// Parse a finite decimal number. `NaN` and infinities are not numbers here.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
