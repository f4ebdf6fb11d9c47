//! # Shared Crypto - Digest and Randomness Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Document, signature image and proof digests |
//! | `random` | OS CSPRNG | Timestamp nonces, proof identifier suffixes |
//!
//! ## Security Properties
//!
//! - **SHA-256**: the only digest in the attestation pipeline; every stored
//!   hash is 64 lowercase hex characters
//! - **OsRng**: cryptographically seeded, safe for concurrent callers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod random;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{
    decode_hex_digest, is_hex_digest, sha256, sha256_hex, Hash, Sha256Hasher, ALGORITHM,
    HEX_DIGEST_LEN,
};
pub use random::{random_base36, random_bytes, random_hex, to_base36};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
