use std::fmt;

/// A single scalar cell from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(t) => t.clone(),
            SqlValue::Blob(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// The canonical result of one executed statement: all rows of a
/// read query, or the affected-row count of anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<SqlValue>>,
    },
    Affected(usize),
}

impl QueryOutcome {
    pub fn row_count(&self) -> usize {
        match self {
            QueryOutcome::Rows { rows, .. } => rows.len(),
            QueryOutcome::Affected(n) => *n,
        }
    }

    /// Flatten the outcome into the text shape handed to the
    /// summarizer: values comma-joined within a row, rows
    /// semicolon-joined.
    pub fn render(&self) -> String {
        match self {
            QueryOutcome::Rows { rows, .. } if rows.is_empty() => "no rows returned".to_string(),
            QueryOutcome::Rows { rows, .. } => rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(SqlValue::render)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect::<Vec<_>>()
                .join("; "),
            QueryOutcome::Affected(n) => format!("{} row(s) affected", n),
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_rows() {
        let outcome = QueryOutcome::Rows {
            columns: vec!["name".to_string()],
            rows: vec![],
        };
        assert_eq!(outcome.render(), "no rows returned");
        assert_eq!(outcome.row_count(), 0);
    }

    #[test]
    fn test_render_rows() {
        let outcome = QueryOutcome::Rows {
            columns: vec!["name".to_string(), "quantity".to_string()],
            rows: vec![
                vec![SqlValue::Text("apple".to_string()), SqlValue::Integer(5)],
                vec![SqlValue::Text("pear".to_string()), SqlValue::Integer(2)],
            ],
        };
        assert_eq!(outcome.render(), "apple, 5; pear, 2");
        assert_eq!(outcome.row_count(), 2);
    }

    #[test]
    fn test_render_affected() {
        assert_eq!(QueryOutcome::Affected(3).render(), "3 row(s) affected");
    }

    #[test]
    fn test_render_null() {
        let outcome = QueryOutcome::Rows {
            columns: vec!["sum".to_string()],
            rows: vec![vec![SqlValue::Null]],
        };
        assert_eq!(outcome.render(), "NULL");
    }
}
