//! SQL schema definitions.

/// Complete schema for the Obol v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Issued identity commitments (grows only)
-- ============================================================

CREATE TABLE IF NOT EXISTS issued_commitments (
    commitment BLOB PRIMARY KEY
);

-- ============================================================
-- Bond records, keyed by nullifier (grows only)
-- ============================================================

CREATE TABLE IF NOT EXISTS bond_records (
    nullifier BLOB PRIMARY KEY,
    amount INTEGER NOT NULL,
    withdrawn INTEGER NOT NULL DEFAULT 0,
    fully_spent INTEGER NOT NULL DEFAULT 0
);

-- ============================================================
-- Observable event history
-- ============================================================

CREATE TABLE IF NOT EXISTS bond_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type TEXT NOT NULL,
    nullifier BLOB,
    recipient BLOB,
    amount INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_created ON bond_history(created_at);
"#;
