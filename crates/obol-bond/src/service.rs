//! The bond service entry points.
//!
//! `create_bond` and `withdraw_bond` each execute to completion or failure
//! as one atomic unit; the in-progress flag rejects any attempt by an
//! external collaborator to re-enter either entry point mid-call.
//!
//! Ordering discipline: every ledger mutation commits strictly before the
//! external proof-verification and value-release calls. A withdrawal whose
//! proof is rejected therefore leaves its reservation committed; tests pin
//! this as observable behavior.

use obol_group::proof::MembershipProof;
use obol_group::MembershipOracle;
use obol_ledger::nullifier::NullifierLedger;
use obol_ledger::registry::CommitmentRegistry;
use obol_types::events::BondEvent;
use obol_types::{Address, Amount, Field, GroupId};
use serde::{Deserialize, Serialize};

use crate::derive::{self, DepositorSecret};
use crate::escrow::ValueEscrow;
use crate::{BondError, Result};

/// The two handles a depositor must keep private.
///
/// This is the only place the commitment and the nullifier are revealed
/// together; presenting the nullifier at withdrawal does not link back to
/// the commitment unless the depositor's secret leaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondCertificate {
    /// The identity commitment inserted into the membership group.
    pub identity_commitment: Field,
    /// The withdrawal nullifier tracking the escrowed balance.
    pub nullifier: Field,
}

/// Orchestrates deposits and withdrawals over one fixed membership group.
///
/// Sole owner and mutator of the commitment registry and the nullifier
/// ledger.
pub struct BondService<O, E> {
    group_id: GroupId,
    registry: CommitmentRegistry,
    ledger: NullifierLedger,
    oracle: O,
    escrow: E,
    events: Vec<BondEvent>,
    in_flight: bool,
}

impl<O: MembershipOracle, E: ValueEscrow> BondService<O, E> {
    /// Create a service with empty registries.
    pub fn new(group_id: GroupId, oracle: O, escrow: E) -> Self {
        Self::from_parts(
            group_id,
            oracle,
            escrow,
            CommitmentRegistry::new(),
            NullifierLedger::new(),
        )
    }

    /// Rebuild a service from previously persisted registries.
    pub fn from_parts(
        group_id: GroupId,
        oracle: O,
        escrow: E,
        registry: CommitmentRegistry,
        ledger: NullifierLedger,
    ) -> Self {
        Self {
            group_id,
            registry,
            ledger,
            oracle,
            escrow,
            events: Vec::new(),
            in_flight: false,
        }
    }

    /// Deposit `deposit` and issue the membership credential for it.
    ///
    /// Derives the identity commitment from (depositor, secret) and the
    /// nullifier from (depositor, group id), inserts the commitment into
    /// the group, and initializes the escrowed balance. All read-checks run
    /// before the first mutation, so a conflicting call changes nothing.
    ///
    /// # Errors
    ///
    /// - [`BondError::ReentrantCall`] if another call is in progress
    /// - [`BondError::ZeroValue`] if `deposit` is zero
    /// - [`BondError::IdentityAlreadyUsed`] if the commitment was issued before
    /// - [`BondError::NullifierAlreadyUsed`] if this depositor already holds
    ///   a bond in this group
    /// - [`BondError::InsertFailed`] if the membership oracle rejects the
    ///   insertion
    pub fn create_bond(
        &mut self,
        depositor: Address,
        secret: &DepositorSecret,
        deposit: Amount,
    ) -> Result<BondCertificate> {
        self.enter()?;
        let result = self.create_bond_inner(depositor, secret, deposit);
        self.in_flight = false;
        result
    }

    fn create_bond_inner(
        &mut self,
        depositor: Address,
        secret: &DepositorSecret,
        deposit: Amount,
    ) -> Result<BondCertificate> {
        if deposit == 0 {
            return Err(BondError::ZeroValue);
        }

        let identity_commitment = derive::identity_commitment(&depositor, secret);
        let nullifier = derive::withdrawal_nullifier(&depositor, &self.group_id);

        if self.registry.is_registered(&identity_commitment) {
            return Err(BondError::IdentityAlreadyUsed);
        }
        if self.ledger.contains(&nullifier) {
            return Err(BondError::NullifierAlreadyUsed);
        }

        // The oracle insertion is the only fallible step left; it runs
        // before any local mutation so a rejection changes nothing here.
        self.oracle
            .insert(self.group_id, identity_commitment)
            .map_err(|err| BondError::InsertFailed(err.to_string()))?;

        self.registry.register(identity_commitment)?;
        self.ledger.initialize(nullifier, deposit)?;
        self.escrow.receive(deposit);

        self.events.push(BondEvent::BondCreated { amount: deposit });
        tracing::info!(amount = deposit, "bond created");

        Ok(BondCertificate {
            identity_commitment,
            nullifier,
        })
    }

    /// Withdraw `amount` of the bond behind `nullifier` to `recipient`.
    ///
    /// The reservation against the ledger commits first; proof verification
    /// and the escrow release follow and neither rolls it back on failure.
    /// The same proof validity is rechecked on every partial redemption.
    ///
    /// # Errors
    ///
    /// - [`BondError::ReentrantCall`] if another call is in progress
    /// - [`BondError::InvalidAmount`] if `amount` is zero
    /// - [`BondError::NullifierUnknown`] / [`BondError::NullifierSpent`] /
    ///   [`BondError::InsufficientRemaining`] from the reservation
    /// - [`BondError::InvalidProof`] if the oracle rejects the proof
    /// - [`BondError::TransferFailed`] if the escrow reports failure
    pub fn withdraw_bond(
        &mut self,
        nullifier: Field,
        recipient: Address,
        amount: Amount,
        proof: &MembershipProof,
    ) -> Result<()> {
        self.enter()?;
        let result = self.withdraw_bond_inner(nullifier, recipient, amount, proof);
        self.in_flight = false;
        result
    }

    fn withdraw_bond_inner(
        &mut self,
        nullifier: Field,
        recipient: Address,
        amount: Amount,
        proof: &MembershipProof,
    ) -> Result<()> {
        if amount == 0 {
            return Err(BondError::InvalidAmount);
        }

        self.ledger.reserve(nullifier, amount)?;

        // Reservation is committed from here on; a re-entrant call or a
        // failing collaborator sees the updated balance.
        self.oracle
            .verify(
                self.group_id,
                proof.merkle_root,
                &proof.signal,
                nullifier,
                &proof.bytes,
            )
            .map_err(|err| BondError::InvalidProof(err.to_string()))?;

        self.escrow
            .release(recipient, amount)
            .map_err(|err| BondError::TransferFailed(err.to_string()))?;

        self.events.push(BondEvent::BondWithdrawn {
            nullifier,
            recipient,
            amount,
        });
        tracing::info!(
            nullifier = %obol_types::to_hex(&nullifier),
            amount,
            "bond withdrawn"
        );

        Ok(())
    }

    /// Remaining withdrawable balance for a nullifier.
    pub fn remaining_amount(&self, nullifier: &Field) -> Result<Amount> {
        Ok(self.ledger.remaining(nullifier)?)
    }

    /// Total escrowed amount for a nullifier.
    pub fn total_bond_amount(&self, nullifier: &Field) -> Result<Amount> {
        Ok(self.ledger.total_amount(nullifier)?)
    }

    /// Whether an identity commitment has ever been issued.
    pub fn is_identity_used(&self, commitment: &Field) -> bool {
        self.registry.is_registered(commitment)
    }

    /// Drain the pending observable events.
    pub fn take_events(&mut self) -> Vec<BondEvent> {
        std::mem::take(&mut self.events)
    }

    /// The fixed group this service operates on.
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// The commitment registry (read-only).
    pub fn registry(&self) -> &CommitmentRegistry {
        &self.registry
    }

    /// The nullifier ledger (read-only).
    pub fn ledger(&self) -> &NullifierLedger {
        &self.ledger
    }

    /// The membership oracle (read-only, e.g. for proof generation).
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The value escrow (read-only).
    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    /// The value escrow (mutable, e.g. for dev knobs).
    pub fn escrow_mut(&mut self) -> &mut E {
        &mut self.escrow
    }

    fn enter(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(BondError::ReentrantCall);
        }
        self.in_flight = true;
        Ok(())
    }
}
