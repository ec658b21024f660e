#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI tracker.
//!
//! This crate provides:
//! - Domain types (entries, categories, validated measurements)
//! - Input validation and BMI classification
//! - Persistence (SQLite history table)
//! - CSV export and trend series for charting

pub mod types;
pub mod error;
pub mod validate;
pub mod classify;
pub mod config;
pub mod logging;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, ExportError, Result, StorageError, ValidationError};
pub use types::*;
pub use validate::validate;
pub use classify::{classify, compute_bmi, format_2dp, round_for_display};
pub use config::Config;
pub use store::EntryStore;
pub use export::{export, read_export, ExportedRow};
