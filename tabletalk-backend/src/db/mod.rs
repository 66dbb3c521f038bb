//! SQLite storage - connection management and table operations.

mod sqlite;
mod tables;

pub use sqlite::Database;

use crate::error::{Error, Result};

/// Read the DDL script executed at startup. A missing or empty file
/// is fatal at init.
pub fn load_schema(path: &str) -> Result<String> {
    let schema = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("schema file '{}': {}", path, e)))?;
    if schema.trim().is_empty() {
        return Err(Error::Config(format!("schema file '{}' is empty", path)));
    }
    Ok(schema)
}
