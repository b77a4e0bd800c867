//! Event history query functions.
//!
//! The service keeps its observable events in memory; whoever drains them
//! can append them here for a durable audit trail.

use obol_types::events::BondEvent;
use obol_types::Field;
use rusqlite::Connection;

use crate::Result;

/// A stored history row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    /// Row id (insertion order).
    pub id: i64,
    /// Event name ("bond_created" / "bond_withdrawn").
    pub event_type: String,
    /// Nullifier, for withdrawal events.
    pub nullifier: Option<Field>,
    /// Recipient, for withdrawal events.
    pub recipient: Option<Field>,
    /// Event amount.
    pub amount: u64,
    /// Unix timestamp provided by the caller.
    pub created_at: u64,
}

/// Append an event to the history.
pub fn record_event(conn: &Connection, event: &BondEvent, created_at: u64) -> Result<()> {
    let (nullifier, recipient, amount) = match event {
        BondEvent::BondCreated { amount } => (None, None, *amount),
        BondEvent::BondWithdrawn {
            nullifier,
            recipient,
            amount,
        } => (
            Some(nullifier.as_slice()),
            Some(recipient.as_slice()),
            *amount,
        ),
    };
    conn.execute(
        "INSERT INTO bond_history (event_type, nullifier, recipient, amount, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            event.name(),
            nullifier,
            recipient,
            amount as i64,
            created_at as i64,
        ],
    )?;
    Ok(())
}

/// List recent history rows, newest first.
pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<HistoryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, event_type, nullifier, recipient, amount, created_at
         FROM bond_history ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<Vec<u8>>>(2)?,
                row.get::<_, Option<Vec<u8>>>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, event_type, nullifier, recipient, amount, created_at)| {
            Ok(HistoryRow {
                id,
                event_type,
                nullifier: nullifier.map(crate::field_from_blob).transpose()?,
                recipient: recipient.map(crate::field_from_blob).transpose()?,
                amount: amount as u64,
                created_at: created_at as u64,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_memory;

    const TEST_TIMESTAMP: u64 = 1_700_000_000;

    #[test]
    fn test_record_and_list() {
        let conn = open_memory().expect("open");
        record_event(&conn, &BondEvent::BondCreated { amount: 100 }, TEST_TIMESTAMP)
            .expect("record");
        record_event(
            &conn,
            &BondEvent::BondWithdrawn {
                nullifier: [0x07; 32],
                recipient: [0xB1; 32],
                amount: 40,
            },
            TEST_TIMESTAMP + 10,
        )
        .expect("record");

        let rows = recent(&conn, 10).expect("recent");
        assert_eq!(rows.len(), 2);

        // Newest first.
        assert_eq!(rows[0].event_type, "bond_withdrawn");
        assert_eq!(rows[0].nullifier, Some([0x07; 32]));
        assert_eq!(rows[0].recipient, Some([0xB1; 32]));
        assert_eq!(rows[0].amount, 40);

        assert_eq!(rows[1].event_type, "bond_created");
        assert_eq!(rows[1].nullifier, None);
        assert_eq!(rows[1].amount, 100);
    }

    #[test]
    fn test_limit_applies() {
        let conn = open_memory().expect("open");
        for amount in 1..=5 {
            record_event(&conn, &BondEvent::BondCreated { amount }, TEST_TIMESTAMP)
                .expect("record");
        }
        let rows = recent(&conn, 3).expect("recent");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].amount, 5);
    }
}
