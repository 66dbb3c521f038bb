//! SQLite database - schema initialization and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, init)
//! - Statement execution (`run_query`)
//!
//! Domain-specific table operations are in the tables/ subdirectory.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;
use crate::models::{QueryOutcome, SqlValue};

/// Main database wrapper. A single mutexed connection serializes all
/// access; the lock is held only for the duration of one call, never
/// across a model round trip.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and run the schema script.
    /// The script is expected to be idempotent (`CREATE TABLE IF NOT
    /// EXISTS`), so calling this twice on the same file is safe.
    pub fn new(database_url: &str, schema: &str) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init(schema)?;
        Ok(db)
    }

    /// Run the user schema script, then create the assistant's own
    /// audit table.
    fn init(&self, schema: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(schema)?;

        // Query audit trail, written after every policy-approved
        // execution. Not part of the user schema file.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS query_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                turn_id TEXT NOT NULL,
                sql_text TEXT NOT NULL,
                success INTEGER NOT NULL,
                row_count INTEGER,
                error TEXT,
                executed_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Execute one statement. Statements that produce columns return
    /// all rows; everything else returns the affected-row count.
    /// Storage failures come back as `Error::Storage`, never a panic.
    pub fn run_query(&self, sql: &str) -> Result<QueryOutcome> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;

        if stmt.column_count() > 0 {
            let columns: Vec<String> = stmt
                .column_names()
                .iter()
                .map(|name| name.to_string())
                .collect();
            let width = columns.len();

            let mut out = Vec::new();
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(scalar_from_ref(row.get_ref(i)?));
                }
                out.push(values);
            }
            Ok(QueryOutcome::Rows { columns, rows: out })
        } else {
            let affected = stmt.execute([])?;
            Ok(QueryOutcome::Affected(affected))
        }
    }
}

fn scalar_from_ref(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Real(f),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}
