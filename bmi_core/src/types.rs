//! Core domain types for the BMI tracker.
//!
//! - Validated form input ([`Measurement`])
//! - Stored history records ([`Entry`]) and their [`Category`]
//! - Chart series points ([`TrendPoint`])

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Category
// ============================================================================

/// BMI category, derived from the BMI value via fixed thresholds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obese")]
    Obese,
}

impl Category {
    /// Human readable label, as stored in the `category` column
    pub fn label(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::NormalWeight => "Normal weight",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a stored label is not one of the four categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown BMI category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Underweight" => Ok(Category::Underweight),
            "Normal weight" => Ok(Category::NormalWeight),
            "Overweight" => Ok(Category::Overweight),
            "Obese" => Ok(Category::Obese),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

// ============================================================================
// Form input and stored entries
// ============================================================================

/// Form input after validation: a trimmed name and in-range numbers
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
}

/// One stored BMI record. Entries are never updated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
    /// Full precision; round with [`crate::round_for_display`] when showing it
    pub bmi: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Entry {
    /// One-line history item: `[timestamp] name - BMI: 22.86 (Normal weight)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - BMI: {} ({})",
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.name,
            crate::classify::format_2dp(self.bmi),
            self.category
        )
    }
}

/// A single point of a user's BMI trend
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub created_at: DateTime<Utc>,
    pub bmi: f64,
}

impl From<&Entry> for TrendPoint {
    fn from(entry: &Entry) -> Self {
        TrendPoint {
            created_at: entry.created_at,
            bmi: entry.bmi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_label_roundtrip() {
        for category in [
            Category::Underweight,
            Category::NormalWeight,
            Category::Overweight,
            Category::Obese,
        ] {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = "Chonky".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("Chonky".into()));
    }

    #[test]
    fn test_entry_display_line() {
        let entry = Entry {
            id: 1,
            name: "Bob".into(),
            weight_kg: 70.0,
            height_m: 1.75,
            bmi: 70.0 / (1.75 * 1.75),
            category: Category::NormalWeight,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        };

        assert_eq!(
            entry.to_string(),
            "[2024-03-01 08:30:00] Bob - BMI: 22.86 (Normal weight)"
        );
    }
}
