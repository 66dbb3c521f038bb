//! Query-safety policy applied before any storage access.
//!
//! Both variants key on the statement's leading verb. The historical
//! substring block-list matched destructive verbs anywhere in the
//! text, which also rejected harmless literals like
//! `SELECT 'insert' FROM products`; matching only the leading verb
//! does not.

use crate::error::{Error, Result};

/// Verbs a read-only statement may start with.
const READ_VERBS: &[&str] = &["select", "with"];

/// Verbs the block-list variant refuses outright.
const DESTRUCTIVE_VERBS: &[&str] = &[
    "delete", "drop", "update", "alter", "insert", "create", "replace", "truncate", "merge",
];

/// The rule set deciding which SQL statements may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Allow-list: only `SELECT` (and `WITH`) statements run.
    #[default]
    ReadOnly,
    /// Block-list: destructive statements are refused, everything
    /// else runs.
    BlockDestructive,
}

impl ExecutionPolicy {
    pub fn from_str(s: &str) -> Option<ExecutionPolicy> {
        match s.to_lowercase().as_str() {
            "readonly" | "read_only" => Some(ExecutionPolicy::ReadOnly),
            "blocklist" | "block_destructive" => Some(ExecutionPolicy::BlockDestructive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPolicy::ReadOnly => "readonly",
            ExecutionPolicy::BlockDestructive => "blocklist",
        }
    }

    /// Validate a statement against the policy. `Err(PolicyRejection)`
    /// means the statement must not reach the store.
    pub fn check(&self, sql: &str) -> Result<()> {
        let verb = leading_verb(sql);
        match self {
            ExecutionPolicy::ReadOnly => {
                if READ_VERBS.contains(&verb.as_str()) {
                    Ok(())
                } else {
                    Err(Error::PolicyRejection(format!(
                        "only read-only queries are allowed, got '{}'",
                        verb
                    )))
                }
            }
            ExecutionPolicy::BlockDestructive => {
                if DESTRUCTIVE_VERBS.contains(&verb.as_str()) {
                    Err(Error::PolicyRejection(format!(
                        "'{}' statements are not allowed",
                        verb
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// First alphabetic token of the statement, lowercased.
fn leading_verb(sql: &str) -> String {
    sql.trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readonly_allows_select() {
        assert!(ExecutionPolicy::ReadOnly.check("SELECT * FROM products").is_ok());
        assert!(ExecutionPolicy::ReadOnly.check("  select name from products").is_ok());
        assert!(ExecutionPolicy::ReadOnly
            .check("WITH t AS (SELECT 1) SELECT * FROM t")
            .is_ok());
    }

    #[test]
    fn test_readonly_rejects_writes() {
        for sql in [
            "DELETE FROM products",
            "INSERT INTO products (name) VALUES ('x')",
            "UPDATE products SET quantity = 0",
            "DROP TABLE products",
            "",
        ] {
            let err = ExecutionPolicy::ReadOnly.check(sql).unwrap_err();
            assert!(matches!(err, Error::PolicyRejection(_)), "{:?}", sql);
        }
    }

    #[test]
    fn test_blocklist_rejects_destructive_verbs() {
        for sql in [
            "DELETE FROM products",
            "drop table products",
            "  Truncate table products",
            "MERGE INTO products USING other ON 1=1",
        ] {
            let err = ExecutionPolicy::BlockDestructive.check(sql).unwrap_err();
            assert!(matches!(err, Error::PolicyRejection(_)), "{:?}", sql);
        }
    }

    #[test]
    fn test_blocklist_allows_reads() {
        assert!(ExecutionPolicy::BlockDestructive
            .check("SELECT * FROM products")
            .is_ok());
        assert!(ExecutionPolicy::BlockDestructive
            .check("EXPLAIN QUERY PLAN SELECT 1")
            .is_ok());
    }

    #[test]
    fn test_destructive_verb_inside_literal_is_allowed() {
        // The old substring block-list rejected this; leading-verb
        // matching must not.
        let sql = "SELECT 'insert' FROM products";
        assert!(ExecutionPolicy::ReadOnly.check(sql).is_ok());
        assert!(ExecutionPolicy::BlockDestructive.check(sql).is_ok());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ExecutionPolicy::from_str("readonly"),
            Some(ExecutionPolicy::ReadOnly)
        );
        assert_eq!(
            ExecutionPolicy::from_str("BLOCKLIST"),
            Some(ExecutionPolicy::BlockDestructive)
        );
        assert_eq!(ExecutionPolicy::from_str("yolo"), None);
    }
}
