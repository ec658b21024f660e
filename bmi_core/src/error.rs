//! Error types for the bmi_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Form input rejected before anything was computed or stored
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// History database failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// CSV export failure
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Raw form input that failed validation. Each variant names its field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("weight must be a number, got {0:?}")]
    NonNumericWeight(String),

    #[error("height must be a number, got {0:?}")]
    NonNumericHeight(String),

    #[error("weight must be greater than 0 and at most 500 kg, got {0}")]
    OutOfRangeWeight(f64),

    #[error("height must be greater than 0 and at most 3 m, got {0}")]
    OutOfRangeHeight(f64),
}

/// Failures of the history database.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database could not be opened, or is not a usable history database
    #[error("cannot open history database {path:?}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to write entry: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    #[error("failed to read history: {0}")]
    ReadFailed(#[source] rusqlite::Error),
}

/// Failures while writing an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write export to {path:?}: {source}")]
    ExportWriteFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
