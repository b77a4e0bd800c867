//! Domain-separated BLAKE3 hashing for the Obol protocol.
//!
//! BLAKE3 serves several distinct purposes in Obol: identity commitment and
//! nullifier derivation, group id derivation, Merkle tree hashing, and the
//! v1 placeholder membership proofs. Cross-domain collisions are prevented
//! by mandatory domain separation using BLAKE3's built-in mode flags.
//!
//! ## Modes
//!
//! - [`hash`] — Pure hashing: Merkle tree leaves, proof transcripts
//! - [`derive_key`] — Key derivation: commitments, nullifiers, group ids
//! - [`keyed_hash`] — Keyed PRF: Merkle inner nodes
//!
//! Every derivation uses a registered context string. Unregistered context
//! strings are a protocol violation.

/// Registered BLAKE3 context strings for the Obol protocol.
/// Using an unregistered context string is a protocol violation.
pub mod contexts {
    pub const IDENTITY_COMMITMENT: &str = "Obol v1 identity-commitment";
    pub const WITHDRAWAL_NULLIFIER: &str = "Obol v1 withdrawal-nullifier";
    pub const GROUP_ID: &str = "Obol v1 group-id";
    pub const MERKLE_INNER_NODE: &str = "Obol v1 merkle-inner-node";
    pub const MEMBERSHIP_PROOF: &str = "Obol v1 membership-proof";

    /// All registered context strings. Used for validation.
    pub const ALL_CONTEXTS: &[&str] = &[
        IDENTITY_COMMITMENT,
        WITHDRAWAL_NULLIFIER,
        GROUP_ID,
        MERKLE_INNER_NODE,
        MEMBERSHIP_PROOF,
    ];
}

/// Compute BLAKE3 hash of the input data.
///
/// Used for Merkle tree leaves and general-purpose hashing.
pub fn hash(data: &[u8]) -> [u8; 32] {
    *::blake3::hash(data).as_bytes()
}

/// Derive a 32-byte value using BLAKE3's built-in key derivation mode.
///
/// The context string must be one of the registered context strings from
/// [`contexts`]. The key material can be any byte slice.
///
/// # Arguments
///
/// * `context` - A registered context string (must start with "Obol v1 ")
/// * `key_material` - The input key material
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    let digest = hasher.finalize();
    out.copy_from_slice(digest.as_bytes());
    out
}

/// Compute a keyed BLAKE3 hash (MAC/PRF).
///
/// The key must be exactly 32 bytes, typically derived via [`derive_key`].
pub fn keyed_hash(key: &[u8; 32], message: &[u8]) -> [u8; 32] {
    *::blake3::keyed_hash(key, message).as_bytes()
}

/// Verify that a context string is registered in the Obol protocol.
pub fn is_registered_context(context: &str) -> bool {
    contexts::ALL_CONTEXTS.contains(&context)
}

/// Compute a Merkle tree leaf hash with domain separation.
///
/// Leaf nodes use `BLAKE3::hash(0x00 || data)` to prevent second-preimage
/// attacks.
pub fn merkle_leaf(data: &[u8]) -> [u8; 32] {
    let mut input = Vec::with_capacity(1 + data.len());
    input.push(0x00);
    input.extend_from_slice(data);
    hash(&input)
}

/// Compute a Merkle tree inner node hash with domain separation.
///
/// Inner nodes use `BLAKE3::keyed_hash(K_inner, left || right)` where
/// `K_inner = BLAKE3::derive_key("Obol v1 merkle-inner-node", "")`.
pub fn merkle_inner(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let k_inner = derive_key(contexts::MERKLE_INNER_NODE, b"");
    let mut message = [0u8; 64];
    message[..32].copy_from_slice(left);
    message[32..].copy_from_slice(right);
    keyed_hash(&k_inner, &message)
}

/// Encode multiple dynamic fields using length-prefixed encoding.
///
/// When deriving values from multiple dynamic fields, inputs use
/// `LE32(len(field1)) || field1 || LE32(len(field2)) || field2 || ...`
/// so that field boundaries cannot be shifted between inputs.
pub fn encode_multi_field(fields: &[&[u8]]) -> Vec<u8> {
    let total_len: usize = fields.iter().map(|f| 4 + f.len()).sum();
    let mut output = Vec::with_capacity(total_len);
    for field in fields {
        output.extend_from_slice(&(field.len() as u32).to_le_bytes());
        output.extend_from_slice(field);
    }
    output
}
