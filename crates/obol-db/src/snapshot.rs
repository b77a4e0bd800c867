//! Snapshot save/load of the in-memory ledger state.
//!
//! Both registries grow only, so a snapshot is a superset of every earlier
//! one; saving uses idempotent upserts inside a single transaction.

use obol_ledger::nullifier::NullifierLedger;
use obol_ledger::registry::CommitmentRegistry;
use rusqlite::Connection;

use crate::queries::{bonds, commitments};
use crate::Result;

/// Persist the registry and ledger into the database.
pub fn save(
    conn: &mut Connection,
    registry: &CommitmentRegistry,
    ledger: &NullifierLedger,
) -> Result<()> {
    let tx = conn.transaction()?;
    for commitment in registry.iter() {
        commitments::insert(&tx, commitment)?;
    }
    for (nullifier, record) in ledger.iter() {
        bonds::upsert(&tx, nullifier, record)?;
    }
    tx.commit()?;

    tracing::info!(
        commitments = registry.len(),
        records = ledger.len(),
        "ledger snapshot saved"
    );
    Ok(())
}

/// Rebuild the registry and ledger from the database.
pub fn load(conn: &Connection) -> Result<(CommitmentRegistry, NullifierLedger)> {
    let registry = CommitmentRegistry::from_commitments(commitments::list(conn)?);
    let ledger = NullifierLedger::from_records(bonds::list(conn)?);
    tracing::info!(
        commitments = registry.len(),
        records = ledger.len(),
        "ledger snapshot loaded"
    );
    Ok((registry, ledger))
}
