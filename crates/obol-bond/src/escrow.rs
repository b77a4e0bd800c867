//! Value escrow seam.
//!
//! The bond core never moves value itself; it records entitlement and
//! signals the escrow. Deposits arrive with the creation call via
//! [`ValueEscrow::receive`], withdrawals request a release via
//! [`ValueEscrow::release`], and the escrow reports success or failure.

use obol_types::{Address, Amount};

/// Error types at the escrow boundary.
#[derive(Debug, thiserror::Error)]
pub enum EscrowError {
    /// The underlying transfer failed.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// The escrow pool does not cover the requested release.
    #[error("insufficient escrowed funds: available {available}, required {required}")]
    InsufficientEscrow {
        /// Funds currently held in escrow.
        available: Amount,
        /// The requested release amount.
        required: Amount,
    },
}

/// Receives deposited value and releases it to withdrawal recipients.
pub trait ValueEscrow {
    /// Take custody of a deposit.
    fn receive(&mut self, amount: Amount);

    /// Release value to a recipient.
    fn release(&mut self, recipient: Address, amount: Amount) -> Result<(), EscrowError>;
}

/// An in-process escrow holding a single pooled balance.
///
/// Tracks every release for audit and offers a failure-injection knob so
/// callers can exercise the transfer-failure path.
#[derive(Debug, Default)]
pub struct InMemoryEscrow {
    escrowed: Amount,
    releases: Vec<(Address, Amount)>,
    fail_next_release: bool,
}

impl InMemoryEscrow {
    /// Create an empty escrow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Funds currently held in escrow.
    pub fn escrowed(&self) -> Amount {
        self.escrowed
    }

    /// All releases performed so far, in order.
    pub fn releases(&self) -> &[(Address, Amount)] {
        &self.releases
    }

    /// Make the next release fail (development/testing only).
    pub fn dev_fail_next_release(&mut self) {
        tracing::warn!("escrow: next release will fail (dev only)");
        self.fail_next_release = true;
    }
}

impl ValueEscrow for InMemoryEscrow {
    fn receive(&mut self, amount: Amount) {
        self.escrowed = self.escrowed.saturating_add(amount);
        tracing::info!(amount, escrowed = self.escrowed, "escrow: deposit received");
    }

    fn release(&mut self, recipient: Address, amount: Amount) -> Result<(), EscrowError> {
        if self.fail_next_release {
            self.fail_next_release = false;
            return Err(EscrowError::TransferFailed(
                "injected failure".to_string(),
            ));
        }
        if amount > self.escrowed {
            return Err(EscrowError::InsufficientEscrow {
                available: self.escrowed,
                required: amount,
            });
        }
        self.escrowed -= amount;
        self.releases.push((recipient, amount));
        tracing::info!(amount, escrowed = self.escrowed, "escrow: value released");
        Ok(())
    }
}
