//! Query audit log operations

use chrono::Utc;

use crate::error::Result;

use super::super::Database;

impl Database {
    /// Record one executed (or failed) statement in the audit trail.
    pub fn record_query(
        &self,
        turn_id: &str,
        sql: &str,
        success: bool,
        row_count: Option<usize>,
        error: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO query_log (turn_id, sql_text, success, row_count, error, executed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                turn_id,
                sql,
                if success { 1 } else { 0 },
                row_count.map(|n| n as i64),
                error,
                now
            ],
        )?;
        Ok(())
    }
}
