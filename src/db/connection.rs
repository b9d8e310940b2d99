use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_DB_PATH: &str = "budget_tracker.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT,
    category TEXT,
    description TEXT,
    amount REAL,
    type TEXT
)";

pub fn establish_connection(path: &Path) -> Result<Connection> {
    debug!(path = %path.display(), "opening database");
    let conn = Connection::open(path)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

pub fn establish_in_memory_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    initialize_schema(&conn)?;
    Ok(conn)
}

/// Creates the transactions table if it does not exist yet. Safe to run on a populated store.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(SCHEMA, [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'transactions'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_in_memory_connection_has_table() {
        let conn = establish_in_memory_connection().unwrap();
        assert_eq!(table_count(&conn), 1);
    }

    #[test]
    fn test_initialize_schema_twice_keeps_rows() {
        let conn = establish_in_memory_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, description, amount, type) VALUES ('2025-01-15 10:00:00', 'Food', 'Lunch', 12.5, 'expense')",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        assert_eq!(table_count(&conn), 1);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
