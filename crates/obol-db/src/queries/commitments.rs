//! Issued-commitment query functions.

use obol_types::Field;
use rusqlite::Connection;

use crate::{DbError, Result};

/// Record an issued commitment. Idempotent.
pub fn insert(conn: &Connection, commitment: &Field) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO issued_commitments (commitment) VALUES (?1)",
        [commitment.as_slice()],
    )?;
    Ok(())
}

/// Whether a commitment has been recorded.
pub fn exists(conn: &Connection, commitment: &Field) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM issued_commitments WHERE commitment = ?1",
            [commitment.as_slice()],
            |row| row.get(0),
        )
        .map_err(DbError::Sqlite)?;
    Ok(count > 0)
}

/// List all recorded commitments.
pub fn list(conn: &Connection) -> Result<Vec<Field>> {
    let mut stmt = conn.prepare("SELECT commitment FROM issued_commitments")?;
    let blobs = stmt
        .query_map([], |row| row.get::<_, Vec<u8>>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    blobs.into_iter().map(crate::field_from_blob).collect()
}
