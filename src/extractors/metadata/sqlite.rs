use super::MetadataMap;
use crate::error::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Table names, columns and row counts, read through a read-only connection
pub fn schema_summary(path: &Path) -> Result<MetadataMap> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut entries = MetadataMap::new();
    entries.insert("Tables", tables.join(", "));

    for table in &tables {
        let mut cols = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let columns = cols
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let quoted = table.replace('"', "\"\"");
        let rows: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM \"{quoted}\""), [], |row| {
            row.get(0)
        })?;

        entries.insert(
            format!("Table_{table}"),
            format!("columns: {}; rows: {rows}", columns.join(", ")),
        );
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE products (id INTEGER PRIMARY KEY, sku TEXT, price REAL);
                 CREATE TABLE suppliers (id INTEGER PRIMARY KEY, name TEXT);
                 INSERT INTO products (sku, price) VALUES ('A-1', 9.5), ('B-2', 3.0);",
            )
            .unwrap();
        }

        let entries = schema_summary(&path).unwrap();
        assert_eq!(entries.get("Tables"), Some("products, suppliers"));
        assert_eq!(
            entries.get("Table_products"),
            Some("columns: id, sku, price; rows: 2")
        );
        assert_eq!(
            entries.get("Table_suppliers"),
            Some("columns: id, name; rows: 0")
        );
    }

    #[test]
    fn test_not_a_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, "just some text that is long enough to not be a header").unwrap();
        assert!(schema_summary(&path).is_err());
    }
}
