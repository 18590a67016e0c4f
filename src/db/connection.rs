use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::StorageError;

/// Ensure the database file exists, create the blob table if needed, and
/// return a live connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;
    create_tables(&conn)?;
    debug!("Opened blob database at {:?}", db_path);
    Ok(conn)
}

/// Same schema on a private in-memory database, for sessions that must not
/// touch disk.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS blobs (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
