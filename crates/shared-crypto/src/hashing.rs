//! # SHA-256 Hashing
//!
//! The single digest primitive used for documents, signature images,
//! proof self-hashes and fallback timestamp integrity.
//!
//! Digests are rendered as 64-character lowercase hex strings, which is the
//! form stored in proofs and tokens.

use sha2::{Digest, Sha256};

use crate::errors::CryptoError;

/// SHA-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Length of a hex-rendered digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Algorithm label recorded next to every digest.
pub const ALGORITHM: &str = "SHA-256";

/// Stateful SHA-256 hasher.
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }

    /// Finalize and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash data and render the digest as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// True when `value` has the shape `sha256_hex` produces: 64 lowercase hex characters.
pub fn is_hex_digest(value: &str) -> bool {
    value.len() == HEX_DIGEST_LEN
        && value
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Decode a 64-character hex digest into raw bytes.
pub fn decode_hex_digest(value: &str) -> Result<Hash, CryptoError> {
    if value.len() != HEX_DIGEST_LEN {
        return Err(CryptoError::InvalidLength {
            expected: HEX_DIGEST_LEN,
            actual: value.len(),
        });
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(value, &mut out).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    Ok(out)
}
