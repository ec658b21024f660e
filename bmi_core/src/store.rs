//! SQLite-backed history of BMI entries.
//!
//! The `history` table is append-only: [`EntryStore::create`] is the only
//! mutating operation. Listings are read fresh from the database on every
//! call, ordered by `created_at` then `id`.

use crate::{classify, compute_bmi, Category, Entry, Measurement, StorageError, TrendPoint};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};

type StoreResult<T> = std::result::Result<T, StorageError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    weight_kg  REAL NOT NULL,
    height_m   REAL NOT NULL,
    bmi        REAL NOT NULL,
    category   TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

const SELECT_ENTRIES: &str =
    "SELECT id, name, weight_kg, height_m, bmi, category, created_at FROM history";

/// Owner of the history database handle.
///
/// The handle is held for the lifetime of the store and released on drop
/// or by [`EntryStore::close`].
pub struct EntryStore {
    conn: Connection,
    path: PathBuf,
    /// Latest timestamp handed out, so `created_at` never goes backwards
    last_created_at: Option<DateTime<Utc>>,
}

impl EntryStore {
    /// Open the store at `path`, creating the file and table if missing
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| open_failed(path, e))?;
        conn.execute_batch(SCHEMA).map_err(|e| open_failed(path, e))?;
        Self::init(conn, path.to_path_buf())
    }

    /// Open an existing store without creating anything.
    ///
    /// A missing file, a file that is not a database, or a database without
    /// the `history` table is [`StorageError::OpenFailed`].
    pub fn open_existing(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| open_failed(path, e))?;
        Self::init(conn, path.to_path_buf())
    }

    /// Open an in-memory store, for tests and scratch use
    pub fn open_in_memory() -> StoreResult<Self> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|e| open_failed(&path, e))?;
        conn.execute_batch(SCHEMA).map_err(|e| open_failed(&path, e))?;
        Self::init(conn, path)
    }

    /// Check the table shape and seed the timestamp watermark
    fn init(conn: Connection, path: PathBuf) -> StoreResult<Self> {
        conn.prepare(&format!("{SELECT_ENTRIES} LIMIT 0"))
            .map_err(|e| open_failed(&path, e))?;

        let last: Option<String> = conn
            .query_row("SELECT MAX(created_at) FROM history", [], |row| row.get(0))
            .map_err(|e| open_failed(&path, e))?;
        let last_created_at = last
            .map(|s| decode_timestamp(&s, 0))
            .transpose()
            .map_err(|e| open_failed(&path, e))?;

        tracing::debug!("Opened history database {:?}", path);
        Ok(Self {
            conn,
            path,
            last_created_at,
        })
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the database handle, reporting any failure to close it
    pub fn close(self) -> StoreResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::WriteFailed(e))?;
        tracing::debug!("Closed history database {:?}", self.path);
        Ok(())
    }

    /// Compute BMI and category, stamp and append a new entry
    pub fn create(&mut self, name: &str, weight_kg: f64, height_m: f64) -> StoreResult<Entry> {
        let bmi = compute_bmi(weight_kg, height_m);
        let category = classify(bmi);
        let created_at = self.next_created_at(Utc::now());

        self.conn
            .execute(
                "INSERT INTO history (name, weight_kg, height_m, bmi, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    name,
                    weight_kg,
                    height_m,
                    bmi,
                    category.label(),
                    encode_timestamp(created_at)
                ],
            )
            .map_err(StorageError::WriteFailed)?;

        let id = self.conn.last_insert_rowid();
        self.last_created_at = Some(created_at);

        tracing::info!("Stored entry {} for {:?} (BMI {:.2}, {})", id, name, bmi, category);

        Ok(Entry {
            id,
            name: name.to_string(),
            weight_kg,
            height_m,
            bmi,
            category,
            created_at,
        })
    }

    /// Store a validated measurement
    pub fn create_from(&mut self, measurement: &Measurement) -> StoreResult<Entry> {
        self.create(
            &measurement.name,
            measurement.weight_kg,
            measurement.height_m,
        )
    }

    /// All entries, oldest first
    pub fn list_all(&self) -> StoreResult<Vec<Entry>> {
        let sql = format!("{SELECT_ENTRIES} ORDER BY created_at ASC, id ASC");
        self.query_entries(&sql, params![])
    }

    /// Entries whose name matches exactly (case-sensitive), oldest first
    pub fn list_for(&self, name: &str) -> StoreResult<Vec<Entry>> {
        let sql = format!("{SELECT_ENTRIES} WHERE name = ?1 ORDER BY created_at ASC, id ASC");
        self.query_entries(&sql, params![name])
    }

    /// Look up a single entry by id
    pub fn get(&self, id: i64) -> StoreResult<Option<Entry>> {
        let sql = format!("{SELECT_ENTRIES} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], entry_from_row)
            .optional()
            .map_err(StorageError::ReadFailed)
    }

    /// `(created_at, bmi)` series for one user, ready for charting
    pub fn trend_for(&self, name: &str) -> StoreResult<Vec<TrendPoint>> {
        let entries = self.list_for(name)?;
        Ok(entries.iter().map(TrendPoint::from).collect())
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql).map_err(StorageError::ReadFailed)?;
        let entries = stmt
            .query_map(params, entry_from_row)
            .map_err(StorageError::ReadFailed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::ReadFailed)?;

        tracing::debug!("Read {} entries from history", entries.len());
        Ok(entries)
    }

    /// Timestamp for the next insert, never earlier than the previous one
    fn next_created_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // Stored text keeps microseconds; truncate so the returned entry
        // equals what a later read produces.
        let now = now.trunc_subsecs(6);
        match self.last_created_at {
            Some(last) if now < last => {
                tracing::warn!("Clock went backwards ({} < {}), reusing last timestamp", now, last);
                last
            }
            _ => now,
        }
    }
}

fn open_failed(path: &Path, source: rusqlite::Error) -> StorageError {
    StorageError::OpenFailed {
        path: path.to_path_buf(),
        source,
    }
}

/// RFC 3339 UTC with fixed microsecond width, so text order is time order
pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let category: String = row.get(5)?;
    let category = category
        .parse::<Category>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    let created_at: String = row.get(6)?;

    Ok(Entry {
        id: row.get(0)?,
        name: row.get(1)?,
        weight_kg: row.get(2)?,
        height_m: row.get(3)?,
        bmi: row.get(4)?,
        category,
        created_at: decode_timestamp(&created_at, 6)?,
    })
}
