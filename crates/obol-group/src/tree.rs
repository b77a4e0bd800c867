//! Append-only commitment tree.
//!
//! Holds the identity commitments of a single group and provides the Merkle
//! root that membership proofs are verified against. Commitments are never
//! removed; uniqueness across the system is enforced by the commitment
//! registry, not the tree.

use obol_crypto::blake3;
use obol_types::Field;
use serde::{Deserialize, Serialize};

use crate::{GroupError, Result};

/// An append-only Merkle tree of identity commitments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitmentTree {
    /// The inserted commitments, in insertion order.
    members: Vec<Field>,
    /// Maximum number of members.
    max_members: usize,
}

impl CommitmentTree {
    /// Create a new empty tree with the given member capacity.
    pub fn new(max_members: usize) -> Self {
        Self {
            members: Vec::new(),
            max_members,
        }
    }

    /// Insert an identity commitment.
    ///
    /// # Errors
    ///
    /// - [`GroupError::MalformedCommitment`] if the commitment is all-zero
    /// - [`GroupError::AtCapacity`] if the tree is full
    pub fn insert(&mut self, commitment: Field) -> Result<()> {
        if commitment == [0u8; 32] {
            return Err(GroupError::MalformedCommitment);
        }
        if self.members.len() >= self.max_members {
            return Err(GroupError::AtCapacity {
                count: self.members.len(),
                max: self.max_members,
            });
        }
        self.members.push(commitment);
        tracing::debug!(members = self.members.len(), "commitment tree: inserted");
        Ok(())
    }

    /// Compute the Merkle root over all current members.
    ///
    /// An empty tree has an all-zero root. Otherwise, a binary Merkle tree
    /// is built with domain-separated BLAKE3 hashing; an odd node is hashed
    /// with itself.
    pub fn root(&self) -> Field {
        if self.members.is_empty() {
            return [0u8; 32];
        }

        let mut layer: Vec<Field> = self
            .members
            .iter()
            .map(|commitment| blake3::merkle_leaf(commitment))
            .collect();

        while layer.len() > 1 {
            let mut next_layer = Vec::with_capacity(layer.len().div_ceil(2));
            let mut i = 0;
            while i < layer.len() {
                if i + 1 < layer.len() {
                    next_layer.push(blake3::merkle_inner(&layer[i], &layer[i + 1]));
                } else {
                    next_layer.push(blake3::merkle_inner(&layer[i], &layer[i]));
                }
                i += 2;
            }
            layer = next_layer;
        }

        layer[0]
    }

    /// Check whether a commitment is a member of this tree.
    pub fn contains(&self, commitment: &Field) -> bool {
        self.members.iter().any(|m| m == commitment)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the tree has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member capacity.
    pub fn max_members(&self) -> usize {
        self.max_members
    }
}
