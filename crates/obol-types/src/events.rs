//! Observable bond events for audit and UI collaborators.
//!
//! The bond service appends events to an in-memory log that callers drain;
//! a persistence layer may additionally record them as history rows.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Field};

/// Events emitted by the bond service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BondEvent {
    /// A deposit was escrowed and a membership credential issued.
    BondCreated {
        /// The deposited amount.
        amount: Amount,
    },
    /// Part or all of a bond was withdrawn to a recipient.
    BondWithdrawn {
        /// The nullifier whose balance was drained.
        nullifier: Field,
        /// The recipient of the released value.
        recipient: Address,
        /// The withdrawn amount.
        amount: Amount,
    },
}

impl BondEvent {
    /// Short event name used in history rows.
    pub fn name(&self) -> &'static str {
        match self {
            BondEvent::BondCreated { .. } => "bond_created",
            BondEvent::BondWithdrawn { .. } => "bond_withdrawn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let created = BondEvent::BondCreated { amount: 100 };
        assert_eq!(created.name(), "bond_created");

        let withdrawn = BondEvent::BondWithdrawn {
            nullifier: [0x01; 32],
            recipient: [0x02; 32],
            amount: 40,
        };
        assert_eq!(withdrawn.name(), "bond_withdrawn");
    }

    #[test]
    fn test_event_equality() {
        let a = BondEvent::BondCreated { amount: 100 };
        let b = BondEvent::BondCreated { amount: 100 };
        assert_eq!(a, b);
    }
}
