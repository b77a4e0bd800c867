//! Per-nullifier bond records and the reservation state machine.
//!
//! Each nullifier owns one [`BondRecord`]: the escrowed amount, the running
//! total withdrawn, and a terminal fully-spent flag. A record moves
//! `Active -> FullySpent` exactly when `withdrawn == amount`; no transition
//! leaves `FullySpent`.
//!
//! [`NullifierLedger::reserve`] validates and mutates in one step so the
//! caller can commit the reservation before touching any external
//! collaborator.

use std::collections::HashMap;

use obol_types::{Amount, Field};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result};

/// The escrow accounting behind one nullifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondRecord {
    /// Total escrowed amount at bond creation.
    pub amount: Amount,
    /// Running total withdrawn so far. Never exceeds `amount`.
    pub withdrawn: Amount,
    /// Terminal flag, true exactly when `withdrawn == amount`.
    pub fully_spent: bool,
}

impl BondRecord {
    /// Remaining withdrawable balance.
    pub fn remaining(&self) -> Amount {
        self.amount - self.withdrawn
    }
}

/// All bond records, keyed by nullifier. Grows only.
#[derive(Clone, Debug, Default)]
pub struct NullifierLedger {
    records: HashMap<Field, BondRecord>,
}

impl NullifierLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Rebuild a ledger from previously stored records.
    pub fn from_records<I: IntoIterator<Item = (Field, BondRecord)>>(records: I) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Create the record for a freshly issued nullifier.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ZeroAmount`] if `amount` is zero
    /// - [`LedgerError::AlreadyExists`] if the nullifier already has a record
    pub fn initialize(&mut self, nullifier: Field, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if self.records.contains_key(&nullifier) {
            return Err(LedgerError::AlreadyExists);
        }
        self.records.insert(
            nullifier,
            BondRecord {
                amount,
                withdrawn: 0,
                fully_spent: false,
            },
        );
        tracing::info!(amount, "bond record initialized");
        Ok(())
    }

    /// Reserve `amount` against the nullifier's remaining balance.
    ///
    /// Validates the record, then increments `withdrawn` and marks the
    /// record fully spent exactly when the balance reaches zero. Either the
    /// whole reservation applies or nothing changes. The caller performs
    /// this mutation before any external value transfer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NullifierUnknown`] if no record exists
    /// - [`LedgerError::NullifierSpent`] if the record is fully spent
    /// - [`LedgerError::ZeroAmount`] if `amount` is zero
    /// - [`LedgerError::InsufficientRemaining`] if `amount` exceeds the balance
    pub fn reserve(&mut self, nullifier: Field, amount: Amount) -> Result<()> {
        let record = self
            .records
            .get_mut(&nullifier)
            .ok_or(LedgerError::NullifierUnknown)?;

        if record.fully_spent {
            return Err(LedgerError::NullifierSpent);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let new_withdrawn = match record.withdrawn.checked_add(amount) {
            Some(total) if total <= record.amount => total,
            _ => {
                return Err(LedgerError::InsufficientRemaining {
                    requested: amount,
                    remaining: record.remaining(),
                })
            }
        };

        record.withdrawn = new_withdrawn;
        record.fully_spent = record.withdrawn == record.amount;

        tracing::info!(
            amount,
            remaining = record.remaining(),
            fully_spent = record.fully_spent,
            "reservation committed"
        );
        Ok(())
    }

    /// Remaining withdrawable balance for a nullifier.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NullifierUnknown`] if no record exists
    pub fn remaining(&self, nullifier: &Field) -> Result<Amount> {
        self.records
            .get(nullifier)
            .map(BondRecord::remaining)
            .ok_or(LedgerError::NullifierUnknown)
    }

    /// Total escrowed amount for a nullifier.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NullifierUnknown`] if no record exists
    pub fn total_amount(&self, nullifier: &Field) -> Result<Amount> {
        self.records
            .get(nullifier)
            .map(|record| record.amount)
            .ok_or(LedgerError::NullifierUnknown)
    }

    /// The record for a nullifier, if any.
    pub fn record(&self, nullifier: &Field) -> Option<&BondRecord> {
        self.records.get(nullifier)
    }

    /// Whether a record exists for this nullifier.
    pub fn contains(&self, nullifier: &Field) -> bool {
        self.records.contains_key(nullifier)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records (for snapshots and audit).
    pub fn iter(&self) -> impl Iterator<Item = (&Field, &BondRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_bond(amount: Amount) -> (NullifierLedger, Field) {
        let nullifier = [0x07; 32];
        let mut ledger = NullifierLedger::new();
        ledger.initialize(nullifier, amount).expect("initialize");
        (ledger, nullifier)
    }

    #[test]
    fn test_initialize() {
        let (ledger, nullifier) = ledger_with_bond(100);
        let record = ledger.record(&nullifier).expect("record");
        assert_eq!(record.amount, 100);
        assert_eq!(record.withdrawn, 0);
        assert!(!record.fully_spent);
        assert_eq!(record.remaining(), 100);
    }

    #[test]
    fn test_initialize_zero_rejected() {
        let mut ledger = NullifierLedger::new();
        assert!(matches!(
            ledger.initialize([0x07; 32], 0),
            Err(LedgerError::ZeroAmount)
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_initialize_twice_rejected() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        let result = ledger.initialize(nullifier, 50);
        assert!(matches!(result, Err(LedgerError::AlreadyExists)));
        assert_eq!(ledger.total_amount(&nullifier).expect("total"), 100);
    }

    #[test]
    fn test_reserve_partial_then_full() {
        let (mut ledger, nullifier) = ledger_with_bond(100);

        ledger.reserve(nullifier, 40).expect("first reservation");
        assert_eq!(ledger.remaining(&nullifier).expect("remaining"), 60);
        assert!(!ledger.record(&nullifier).expect("record").fully_spent);

        ledger.reserve(nullifier, 60).expect("second reservation");
        assert_eq!(ledger.remaining(&nullifier).expect("remaining"), 0);
        assert!(ledger.record(&nullifier).expect("record").fully_spent);
    }

    #[test]
    fn test_reserve_after_fully_spent_rejected() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        ledger.reserve(nullifier, 100).expect("drain");
        assert!(matches!(
            ledger.reserve(nullifier, 1),
            Err(LedgerError::NullifierSpent)
        ));
    }

    #[test]
    fn test_reserve_unknown_nullifier() {
        let mut ledger = NullifierLedger::new();
        assert!(matches!(
            ledger.reserve([0x07; 32], 1),
            Err(LedgerError::NullifierUnknown)
        ));
    }

    #[test]
    fn test_reserve_zero_rejected() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        assert!(matches!(
            ledger.reserve(nullifier, 0),
            Err(LedgerError::ZeroAmount)
        ));
        assert_eq!(ledger.remaining(&nullifier).expect("remaining"), 100);
    }

    #[test]
    fn test_over_reservation_leaves_state_unchanged() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        ledger.reserve(nullifier, 40).expect("reserve");

        let result = ledger.reserve(nullifier, 61);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientRemaining {
                requested: 61,
                remaining: 60,
            })
        ));

        let record = ledger.record(&nullifier).expect("record");
        assert_eq!(record.withdrawn, 40);
        assert!(!record.fully_spent);
    }

    #[test]
    fn test_reserve_overflow_guarded() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        ledger.reserve(nullifier, 40).expect("reserve");
        let result = ledger.reserve(nullifier, u64::MAX);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientRemaining { remaining: 60, .. })
        ));
    }

    #[test]
    fn test_invariants_hold_across_sequence() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        for amount in [10, 25, 5, 60] {
            ledger.reserve(nullifier, amount).expect("reserve");
            let record = ledger.record(&nullifier).expect("record");
            assert!(record.withdrawn <= record.amount);
            assert_eq!(record.fully_spent, record.withdrawn == record.amount);
        }
        assert!(ledger.record(&nullifier).expect("record").fully_spent);
    }

    #[test]
    fn test_from_records_roundtrip() {
        let (mut ledger, nullifier) = ledger_with_bond(100);
        ledger.reserve(nullifier, 40).expect("reserve");

        let restored =
            NullifierLedger::from_records(ledger.iter().map(|(n, r)| (*n, *r)));
        assert_eq!(restored.remaining(&nullifier).expect("remaining"), 60);
        assert_eq!(restored.len(), 1);
    }
}
