//! In-memory membership oracle.
//!
//! Holds the groups themselves and answers insert/verify calls locally.
//! In a deployment where the tree lives elsewhere (a chain contract, a
//! remote service), this is replaced by another [`MembershipOracle`]
//! implementation; the bond core does not change.

use std::collections::HashMap;

use obol_types::{Field, GroupId};

use crate::proof;
use crate::tree::CommitmentTree;
use crate::{GroupError, MembershipOracle, Result};

/// A [`MembershipOracle`] backed by in-process commitment trees.
#[derive(Debug, Default)]
pub struct LocalOracle {
    groups: HashMap<GroupId, CommitmentTree>,
}

impl LocalOracle {
    /// Create an oracle with no groups.
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Create a group with the given member capacity.
    ///
    /// # Errors
    ///
    /// - [`GroupError::GroupExists`] if the id is already taken
    pub fn create_group(&mut self, group_id: GroupId, max_members: usize) -> Result<()> {
        if self.groups.contains_key(&group_id) {
            return Err(GroupError::GroupExists);
        }
        self.groups.insert(group_id, CommitmentTree::new(max_members));
        tracing::info!(max_members, "membership group created");
        Ok(())
    }

    /// Access a group's tree, e.g. for proof generation.
    pub fn group(&self, group_id: &GroupId) -> Option<&CommitmentTree> {
        self.groups.get(group_id)
    }

    /// Current Merkle root of a group.
    ///
    /// # Errors
    ///
    /// - [`GroupError::UnknownGroup`] if the group does not exist
    pub fn root(&self, group_id: &GroupId) -> Result<Field> {
        self.groups
            .get(group_id)
            .map(CommitmentTree::root)
            .ok_or(GroupError::UnknownGroup)
    }
}

impl MembershipOracle for LocalOracle {
    fn insert(&mut self, group_id: GroupId, commitment: Field) -> Result<()> {
        let tree = self
            .groups
            .get_mut(&group_id)
            .ok_or(GroupError::UnknownGroup)?;
        tree.insert(commitment)
    }

    fn verify(
        &self,
        group_id: GroupId,
        root: Field,
        signal: &[u8],
        nullifier: Field,
        proof_bytes: &[u8],
    ) -> Result<()> {
        let tree = self.groups.get(&group_id).ok_or(GroupError::UnknownGroup)?;
        if root != tree.root() {
            return Err(GroupError::UnknownRoot);
        }
        proof::verify_membership(&root, signal, &nullifier, proof_bytes)
    }
}
