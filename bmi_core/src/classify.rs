//! BMI computation and WHO category thresholds.
//!
//! Boundaries belong to the higher category: 18.5 is Normal weight,
//! 25.0 is Overweight, 30.0 is Obese.

use crate::Category;

const NORMAL_FROM: f64 = 18.5;
const OVERWEIGHT_FROM: f64 = 25.0;
const OBESE_FROM: f64 = 30.0;

/// Body Mass Index: weight in kilograms over height in metres squared
pub fn compute_bmi(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// Map a BMI value to its category
pub fn classify(bmi: f64) -> Category {
    if bmi < NORMAL_FROM {
        Category::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        Category::NormalWeight
    } else if bmi < OBESE_FROM {
        Category::Overweight
    } else {
        Category::Obese
    }
}

/// Round to 2 decimal places for display. Stored values keep full precision.
///
/// The value is first snapped to 6 decimals so representation error does not
/// flip a half-way case: 120 / 1.60² is 46.8749999... in binary but shows as
/// 46.88.
pub fn round_for_display(value: f64) -> f64 {
    let snapped = (value * 1e6).round() / 1e6;
    (snapped * 100.0).round() / 100.0
}

/// Fixed 2-decimal text used by history lines and exports
pub fn format_2dp(value: f64) -> String {
    format!("{:.2}", round_for_display(value))
}
