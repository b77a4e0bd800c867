//! # obol-ledger
//!
//! The two registries at the heart of the bond core.
//!
//! [`registry::CommitmentRegistry`] records every identity commitment ever
//! issued and rejects duplicates. [`nullifier::NullifierLedger`] tracks the
//! escrowed balance behind each withdrawal nullifier and enforces the
//! partial-redemption state machine: a balance is drained across any number
//! of reservations, the running total never exceeds the deposit, and a
//! fully-drained record is terminal.
//!
//! Both structures grow only; nothing is ever deleted.
//!
//! ## Modules
//!
//! - [`registry`] — Issued identity commitments
//! - [`nullifier`] — Per-nullifier bond records and reservations

pub mod nullifier;
pub mod registry;

use obol_types::Amount;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The identity commitment was already registered.
    #[error("identity commitment already registered")]
    AlreadyRegistered,

    /// A bond record already exists for this nullifier.
    #[error("bond record already exists for this nullifier")]
    AlreadyExists,

    /// No bond record exists for this nullifier.
    #[error("unknown nullifier")]
    NullifierUnknown,

    /// The bond behind this nullifier is fully spent.
    #[error("nullifier is fully spent")]
    NullifierSpent,

    /// Amounts must be positive.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The reservation exceeds the remaining balance.
    #[error("insufficient remaining balance: requested {requested}, remaining {remaining}")]
    InsufficientRemaining {
        /// The requested reservation amount.
        requested: Amount,
        /// The remaining balance on the record.
        remaining: Amount,
    },
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
