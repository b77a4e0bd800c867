//! # obol-crypto
//!
//! Hashing primitives for the Obol protocol.
//!
//! The cryptographic suite is fixed: domain-separated BLAKE3 for every
//! off-circuit hashing need. No algorithm negotiation is permitted.
//!
//! ## Modules
//!
//! - [`blake3`] — Domain-separated BLAKE3 hashing (all registered context
//!   strings)

pub mod blake3;
