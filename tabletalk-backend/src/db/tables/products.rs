//! Product table operations

use crate::error::Result;

use super::super::Database;

impl Database {
    /// Names of all registered products, used as the entity context
    /// injected into the classification prompt.
    pub fn product_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM products ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(
            path.to_str().unwrap(),
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                quantity INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
        (dir, db)
    }

    #[test]
    fn test_product_names_empty() {
        let (_dir, db) = temp_db();
        assert!(db.product_names().unwrap().is_empty());
    }

    #[test]
    fn test_product_names_sorted() {
        let (_dir, db) = temp_db();
        db.run_query("INSERT INTO products (name, quantity) VALUES ('pear', 2)")
            .unwrap();
        db.run_query("INSERT INTO products (name, quantity) VALUES ('apple', 5)")
            .unwrap();
        assert_eq!(
            db.product_names().unwrap(),
            vec!["apple".to_string(), "pear".to_string()]
        );
    }
}
