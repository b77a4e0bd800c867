//! Deterministic derivation of identity commitments and nullifiers.
//!
//! Both derivations are public pure functions so external auditors can
//! recompute them off-path. The commitment binds a depositor-chosen secret
//! to a group slot; the nullifier binds the depositor to a withdrawal
//! context. Presenting the nullifier later does not reveal the commitment
//! as long as the secret stays private.

use obol_crypto::blake3;
use obol_types::{Address, Field, GroupId};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A depositor-chosen secret, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DepositorSecret([u8; 32]);

impl DepositorSecret {
    /// Generate a fresh random secret from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
        Self(bytes)
    }

    /// Wrap existing secret bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for DepositorSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DepositorSecret(..)")
    }
}

/// Derive the identity commitment for a depositor and secret.
///
/// `commitment = BLAKE3::derive_key("Obol v1 identity-commitment",
/// LE32-prefixed(depositor, secret))`
pub fn identity_commitment(depositor: &Address, secret: &DepositorSecret) -> Field {
    let fields = blake3::encode_multi_field(&[&depositor[..], &secret.as_bytes()[..]]);
    blake3::derive_key(blake3::contexts::IDENTITY_COMMITMENT, &fields)
}

/// Derive the withdrawal nullifier for a depositor within a group.
///
/// `nullifier = BLAKE3::derive_key("Obol v1 withdrawal-nullifier",
/// LE32-prefixed(depositor, group_id))`
///
/// The derivation takes no per-bond salt, so one depositor address holds at
/// most one active bond per group.
pub fn withdrawal_nullifier(depositor: &Address, group_id: &GroupId) -> Field {
    let fields = blake3::encode_multi_field(&[&depositor[..], &group_id[..]]);
    blake3::derive_key(blake3::contexts::WITHDRAWAL_NULLIFIER, &fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_commitment_deterministic() {
        let depositor = [0xA1; 32];
        let secret = DepositorSecret::from_bytes([0x55; 32]);
        assert_eq!(
            identity_commitment(&depositor, &secret),
            identity_commitment(&depositor, &secret)
        );
    }

    #[test]
    fn test_identity_commitment_varies_with_secret() {
        let depositor = [0xA1; 32];
        let a = identity_commitment(&depositor, &DepositorSecret::from_bytes([0x01; 32]));
        let b = identity_commitment(&depositor, &DepositorSecret::from_bytes([0x02; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_commitment_varies_with_depositor() {
        let secret = DepositorSecret::from_bytes([0x55; 32]);
        let a = identity_commitment(&[0xA1; 32], &secret);
        let b = identity_commitment(&[0xA2; 32], &secret);
        assert_ne!(a, b);
    }

    #[test]
    fn test_nullifier_deterministic_and_varies_with_group() {
        let depositor = [0xA1; 32];
        let group_one = [0x01; 32];
        let group_two = [0x02; 32];
        assert_eq!(
            withdrawal_nullifier(&depositor, &group_one),
            withdrawal_nullifier(&depositor, &group_one)
        );
        assert_ne!(
            withdrawal_nullifier(&depositor, &group_one),
            withdrawal_nullifier(&depositor, &group_two)
        );
    }

    #[test]
    fn test_commitment_and_nullifier_domains_disjoint() {
        // Same inputs through both derivations must never collide.
        let depositor = [0xA1; 32];
        let other = [0x55; 32];
        let commitment = identity_commitment(&depositor, &DepositorSecret::from_bytes(other));
        let nullifier = withdrawal_nullifier(&depositor, &other);
        assert_ne!(commitment, nullifier);
    }

    #[test]
    fn test_generated_secrets_differ() {
        let a = DepositorSecret::generate();
        let b = DepositorSecret::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = DepositorSecret::from_bytes([0x55; 32]);
        assert_eq!(format!("{secret:?}"), "DepositorSecret(..)");
    }
}
