//! Bond record query functions.

use obol_ledger::nullifier::BondRecord;
use obol_types::Field;
use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Insert or update the record for a nullifier.
pub fn upsert(conn: &Connection, nullifier: &Field, record: &BondRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO bond_records (nullifier, amount, withdrawn, fully_spent)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(nullifier) DO UPDATE SET
             amount = excluded.amount,
             withdrawn = excluded.withdrawn,
             fully_spent = excluded.fully_spent",
        rusqlite::params![
            nullifier.as_slice(),
            record.amount as i64,
            record.withdrawn as i64,
            record.fully_spent as i64,
        ],
    )?;
    Ok(())
}

/// Fetch the record for a nullifier, if any.
pub fn get(conn: &Connection, nullifier: &Field) -> Result<Option<BondRecord>> {
    let row = conn
        .query_row(
            "SELECT amount, withdrawn, fully_spent FROM bond_records WHERE nullifier = ?1",
            [nullifier.as_slice()],
            |row| {
                Ok(BondRecord {
                    amount: row.get::<_, i64>(0)? as u64,
                    withdrawn: row.get::<_, i64>(1)? as u64,
                    fully_spent: row.get::<_, i64>(2)? != 0,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// List all bond records.
pub fn list(conn: &Connection) -> Result<Vec<(Field, BondRecord)>> {
    let mut stmt =
        conn.prepare("SELECT nullifier, amount, withdrawn, fully_spent FROM bond_records")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, Vec<u8>>(0)?,
                BondRecord {
                    amount: row.get::<_, i64>(1)? as u64,
                    withdrawn: row.get::<_, i64>(2)? as u64,
                    fully_spent: row.get::<_, i64>(3)? != 0,
                },
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(blob, record)| Ok((crate::field_from_blob(blob)?, record)))
        .collect()
}
