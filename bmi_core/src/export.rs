//! CSV export of stored entries.
//!
//! The column order and header are fixed:
//! `id,name,weight_kg,height_m,bmi,category,created_at`.
//! The destination is opened for writing in place and truncated, so a new
//! file gets the usual permissions and a read-only one is refused.

use crate::classify::format_2dp;
use crate::store::encode_timestamp;
use crate::{Category, Entry, ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const HEADER: [&str; 7] = [
    "id",
    "name",
    "weight_kg",
    "height_m",
    "bmi",
    "category",
    "created_at",
];

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: i64,
    name: &'a str,
    weight_kg: String,
    height_m: String,
    bmi: String,
    category: &'static str,
    created_at: String,
}

impl<'a> From<&'a Entry> for CsvRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        CsvRow {
            id: entry.id,
            name: &entry.name,
            weight_kg: format_2dp(entry.weight_kg),
            height_m: format_2dp(entry.height_m),
            bmi: format_2dp(entry.bmi),
            category: entry.category.label(),
            created_at: encode_timestamp(entry.created_at),
        }
    }
}

/// A row parsed back from an export file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedRow {
    pub id: i64,
    pub name: String,
    pub weight_kg: f64,
    pub height_m: f64,
    pub bmi: f64,
    pub category: Category,
    pub created_at: String,
}

/// Write `entries` as CSV to `destination`, replacing any existing file.
///
/// Returns the number of data rows written.
pub fn export(entries: &[Entry], destination: &Path) -> std::result::Result<usize, ExportError> {
    let count = write_csv(entries, destination).map_err(|source| {
        ExportError::ExportWriteFailed {
            path: destination.to_path_buf(),
            source,
        }
    })?;

    tracing::info!("Exported {} entries to {:?}", count, destination);
    Ok(count)
}

fn write_csv(entries: &[Entry], destination: &Path) -> std::result::Result<usize, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(destination)?;

    // Written by hand so an empty export still carries the header
    writer.write_record(HEADER)?;
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    Ok(entries.len())
}

/// Parse an export file back into rows
pub fn read_export(path: &Path) -> Result<Vec<ExportedRow>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(crate::Error::Other(format!(
            "unexpected export header: {:?}",
            headers
        )));
    }

    let rows = reader
        .deserialize::<ExportedRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::debug!("Read {} rows from export {:?}", rows.len(), path);
    Ok(rows)
}
