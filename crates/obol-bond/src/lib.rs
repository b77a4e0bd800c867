//! # obol-bond
//!
//! The bond orchestrator: deposits become anonymous membership credentials,
//! and credentials are redeemed — all at once or in parts — against escrowed
//! value by presenting a membership proof instead of an identity.
//!
//! The service composes the commitment registry, the nullifier ledger, a
//! [`MembershipOracle`](obol_group::MembershipOracle), and a
//! [`ValueEscrow`](escrow::ValueEscrow), and enforces the cross-entity
//! rules: one credential and one nullifier per deposit, ledger mutations
//! strictly before external value transfer, and no re-entrant invocation.
//!
//! ## Modules
//!
//! - [`derive`] — Public pure commitment/nullifier derivation
//! - [`escrow`] — Value escrow seam and in-memory implementation
//! - [`service`] — The [`BondService`](service::BondService) entry points
//! - [`config`] — TOML configuration

pub mod config;
pub mod derive;
pub mod escrow;
pub mod service;

use obol_ledger::LedgerError;
use obol_types::Amount;

/// Error types for bond operations.
#[derive(Debug, thiserror::Error)]
pub enum BondError {
    /// A bond cannot escrow a zero deposit.
    #[error("deposit value must be non-zero")]
    ZeroValue,

    /// A withdrawal must request a positive amount.
    #[error("withdrawal amount must be non-zero")]
    InvalidAmount,

    /// The derived identity commitment was already used by an earlier bond.
    #[error("identity commitment already used")]
    IdentityAlreadyUsed,

    /// A bond already exists for this depositor address and group.
    #[error("a bond already exists for this depositor and group")]
    NullifierAlreadyUsed,

    /// No bond exists for this nullifier.
    #[error("unknown nullifier")]
    NullifierUnknown,

    /// The bond behind this nullifier is fully spent.
    #[error("bond is fully spent")]
    NullifierSpent,

    /// The withdrawal exceeds the remaining balance.
    #[error("insufficient remaining balance: requested {requested}, remaining {remaining}")]
    InsufficientRemaining {
        /// The requested withdrawal amount.
        requested: Amount,
        /// The remaining balance on the bond.
        remaining: Amount,
    },

    /// The membership oracle rejected the group insertion.
    #[error("group insertion failed: {0}")]
    InsertFailed(String),

    /// The membership oracle rejected the proof.
    #[error("membership proof rejected: {0}")]
    InvalidProof(String),

    /// The escrow reported a failed value release.
    #[error("value transfer failed: {0}")]
    TransferFailed(String),

    /// An entry point was invoked while another call was in progress.
    #[error("re-entrant call rejected")]
    ReentrantCall,
}

impl From<LedgerError> for BondError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyRegistered => BondError::IdentityAlreadyUsed,
            LedgerError::AlreadyExists => BondError::NullifierAlreadyUsed,
            LedgerError::NullifierUnknown => BondError::NullifierUnknown,
            LedgerError::NullifierSpent => BondError::NullifierSpent,
            LedgerError::ZeroAmount => BondError::InvalidAmount,
            LedgerError::InsufficientRemaining {
                requested,
                remaining,
            } => BondError::InsufficientRemaining {
                requested,
                remaining,
            },
        }
    }
}

/// Convenience result type for bond operations.
pub type Result<T> = std::result::Result<T, BondError>;
