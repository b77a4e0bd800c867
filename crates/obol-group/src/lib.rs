//! # obol-group
//!
//! Anonymous membership groups and the oracle seam the bond core consumes.
//!
//! A group is an append-only set of identity commitments with a Merkle root.
//! Membership is attested by a proof over (root, signal, nullifier) that
//! reveals nothing about which commitment the prover holds. The bond core
//! never maintains the tree itself; it talks to a [`MembershipOracle`].
//!
//! ## Modules
//!
//! - [`tree`] — Append-only commitment tree with a Merkle root
//! - [`proof`] — Membership proof artifacts (v1 placeholder proofs)
//! - [`oracle`] — In-memory [`MembershipOracle`] implementation

pub mod oracle;
pub mod proof;
pub mod tree;

use obol_types::{Field, GroupId};

/// Error types for group and membership-proof operations.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// The group id is not known to the oracle.
    #[error("unknown group")]
    UnknownGroup,

    /// A group with this id already exists.
    #[error("group already exists")]
    GroupExists,

    /// The group is at member capacity.
    #[error("group is at capacity ({count} members, max {max})")]
    AtCapacity {
        /// Current number of members.
        count: usize,
        /// Maximum number of members.
        max: usize,
    },

    /// The commitment is malformed (all-zero).
    #[error("malformed identity commitment")]
    MalformedCommitment,

    /// The prover's commitment is not a member of the group.
    #[error("commitment is not a group member")]
    NotAMember,

    /// The claimed Merkle root does not match the group's current root.
    #[error("unknown merkle root for this group")]
    UnknownRoot,

    /// The proof failed verification.
    #[error("membership proof rejected")]
    ProofRejected,
}

/// Convenience result type for group operations.
pub type Result<T> = std::result::Result<T, GroupError>;

/// Answers membership questions for the bond core.
///
/// `insert` is called once per bond creation; `verify` is called on every
/// withdrawal, so the same proof validity is rechecked on each partial
/// redemption.
pub trait MembershipOracle {
    /// Insert an identity commitment into a group.
    fn insert(&mut self, group_id: GroupId, commitment: Field) -> Result<()>;

    /// Verify that `proof` attests membership for the given signal and
    /// nullifier against the claimed Merkle root.
    fn verify(
        &self,
        group_id: GroupId,
        root: Field,
        signal: &[u8],
        nullifier: Field,
        proof: &[u8],
    ) -> Result<()>;
}

/// Derive a group id from a human-readable label.
///
/// `group_id = BLAKE3::derive_key("Obol v1 group-id", label)`
pub fn derive_group_id(label: &str) -> GroupId {
    obol_crypto::blake3::derive_key(obol_crypto::blake3::contexts::GROUP_ID, label.as_bytes())
}
