//! Membership proof artifacts.
//!
//! A proof attests that the prover holds some commitment in the group
//! without revealing which one, bound to a signal and a nullifier so it
//! cannot be replayed in another context.
//!
//! In v1 this is a placeholder scheme: the proof bytes are a
//! domain-separated BLAKE3 transcript of the public inputs. The interface
//! (public inputs in, accept/reject out) is shaped so a Groth16 backend can
//! replace the placeholder without touching callers.

use obol_crypto::blake3;
use obol_types::Field;
use serde::{Deserialize, Serialize};

use crate::tree::CommitmentTree;
use crate::{GroupError, Result};

/// A membership proof presented at withdrawal time.
///
/// Not persisted; only validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipProof {
    /// The Merkle root the proof was generated against.
    pub merkle_root: Field,
    /// Caller-chosen signal bound into the proof.
    pub signal: Vec<u8>,
    /// Opaque proof data.
    pub bytes: Vec<u8>,
}

/// Generate a membership proof for a commitment held in `tree`.
///
/// The prover must hold a commitment that is actually a member; the
/// resulting proof does not reveal which one.
///
/// # Errors
///
/// - [`GroupError::NotAMember`] if the commitment is not in the tree
pub fn prove_membership(
    tree: &CommitmentTree,
    commitment: &Field,
    signal: &[u8],
    nullifier: Field,
) -> Result<MembershipProof> {
    if !tree.contains(commitment) {
        return Err(GroupError::NotAMember);
    }

    let root = tree.root();
    let bytes = proof_transcript(&root, signal, &nullifier);

    tracing::debug!(members = tree.len(), "generated membership proof (v1)");

    Ok(MembershipProof {
        merkle_root: root,
        signal: signal.to_vec(),
        bytes: bytes.to_vec(),
    })
}

/// Verify proof bytes against the public inputs.
///
/// # Errors
///
/// - [`GroupError::ProofRejected`] if the proof does not match
pub fn verify_membership(
    root: &Field,
    signal: &[u8],
    nullifier: &Field,
    proof: &[u8],
) -> Result<()> {
    let expected = proof_transcript(root, signal, nullifier);
    if proof != expected {
        return Err(GroupError::ProofRejected);
    }
    Ok(())
}

/// The v1 proof transcript over the public inputs.
///
/// `BLAKE3::derive_key("Obol v1 membership-proof", LE32-prefixed(root, signal, nullifier))`
fn proof_transcript(root: &Field, signal: &[u8], nullifier: &Field) -> [u8; 32] {
    let fields = blake3::encode_multi_field(&[&root[..], signal, &nullifier[..]]);
    blake3::derive_key(blake3::contexts::MEMBERSHIP_PROOF, &fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_member(commitment: Field) -> CommitmentTree {
        let mut tree = CommitmentTree::new(16);
        tree.insert(commitment).expect("insert");
        tree
    }

    #[test]
    fn test_prove_and_verify() {
        let commitment = [0x42; 32];
        let tree = tree_with_member(commitment);
        let nullifier = [0x07; 32];

        let proof =
            prove_membership(&tree, &commitment, b"withdraw", nullifier).expect("prove");
        assert_eq!(proof.merkle_root, tree.root());
        verify_membership(&proof.merkle_root, &proof.signal, &nullifier, &proof.bytes)
            .expect("verify");
    }

    #[test]
    fn test_prove_requires_membership() {
        let tree = tree_with_member([0x42; 32]);
        let result = prove_membership(&tree, &[0x99; 32], b"withdraw", [0x07; 32]);
        assert!(matches!(result, Err(GroupError::NotAMember)));
    }

    #[test]
    fn test_verify_rejects_wrong_nullifier() {
        let commitment = [0x42; 32];
        let tree = tree_with_member(commitment);
        let proof = prove_membership(&tree, &commitment, b"withdraw", [0x07; 32]).expect("prove");

        let result =
            verify_membership(&proof.merkle_root, &proof.signal, &[0x08; 32], &proof.bytes);
        assert!(matches!(result, Err(GroupError::ProofRejected)));
    }

    #[test]
    fn test_verify_rejects_wrong_signal() {
        let commitment = [0x42; 32];
        let tree = tree_with_member(commitment);
        let nullifier = [0x07; 32];
        let proof = prove_membership(&tree, &commitment, b"withdraw", nullifier).expect("prove");

        let result = verify_membership(&proof.merkle_root, b"other signal", &nullifier, &proof.bytes);
        assert!(matches!(result, Err(GroupError::ProofRejected)));
    }

    #[test]
    fn test_verify_rejects_tampered_bytes() {
        let commitment = [0x42; 32];
        let tree = tree_with_member(commitment);
        let nullifier = [0x07; 32];
        let mut proof =
            prove_membership(&tree, &commitment, b"withdraw", nullifier).expect("prove");
        proof.bytes[0] ^= 0x01;

        let result =
            verify_membership(&proof.merkle_root, &proof.signal, &nullifier, &proof.bytes);
        assert!(matches!(result, Err(GroupError::ProofRejected)));
    }

    #[test]
    fn test_proof_bound_to_root() {
        let commitment = [0x42; 32];
        let mut tree = tree_with_member(commitment);
        let nullifier = [0x07; 32];
        let proof = prove_membership(&tree, &commitment, b"withdraw", nullifier).expect("prove");

        // Growing the tree changes the root; the old proof no longer matches it.
        tree.insert([0x43; 32]).expect("insert");
        let result = verify_membership(&tree.root(), &proof.signal, &nullifier, &proof.bytes);
        assert!(matches!(result, Err(GroupError::ProofRejected)));
    }
}
