//! Issued identity commitment registry.
//!
//! Each identity commitment may be inserted into the membership group at
//! most once system-wide. The registry is an exact set rather than a
//! probabilistic filter: a false positive here would reject an honest
//! depositor, which is not acceptable for issuance.

use std::collections::HashSet;

use obol_types::Field;

use crate::{LedgerError, Result};

/// The set of identity commitments ever issued. Grows only.
#[derive(Clone, Debug, Default)]
pub struct CommitmentRegistry {
    issued: HashSet<Field>,
}

impl CommitmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            issued: HashSet::new(),
        }
    }

    /// Rebuild a registry from previously issued commitments.
    pub fn from_commitments<I: IntoIterator<Item = Field>>(commitments: I) -> Self {
        Self {
            issued: commitments.into_iter().collect(),
        }
    }

    /// Mark a commitment as used.
    ///
    /// The check and the insertion are a single operation, so no two calls
    /// with the same commitment can both succeed.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AlreadyRegistered`] if the commitment was already used
    pub fn register(&mut self, commitment: Field) -> Result<()> {
        if !self.issued.insert(commitment) {
            return Err(LedgerError::AlreadyRegistered);
        }
        tracing::debug!(issued = self.issued.len(), "commitment registered");
        Ok(())
    }

    /// Whether a commitment has ever been registered.
    pub fn is_registered(&self, commitment: &Field) -> bool {
        self.issued.contains(commitment)
    }

    /// Number of issued commitments.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// Iterate over all issued commitments (for snapshots and audit).
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.issued.iter()
    }
}
