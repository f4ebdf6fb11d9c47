//! # Proof Errors
//!
//! `ProofError` is returned by the builder. Verification never fails with an
//! error; it reports `ProofErrorCode`s instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building a proof.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    /// A required input is empty or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The canonical form could not be produced
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Stable code for each verification check that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofErrorCode {
    /// `signature.hash` does not match the image bytes.
    SignatureHashMismatch,
    /// `integrity.proof_hash` does not match the canonical form.
    ProofHashMismatch,
    /// The client timestamp lies beyond the clock-skew tolerance.
    TimestampInFuture,
    /// Presented document bytes do not match `document.hash`.
    DocumentHashMismatch,
}

impl ProofErrorCode {
    /// Wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignatureHashMismatch => "SIGNATURE_HASH_MISMATCH",
            Self::ProofHashMismatch => "PROOF_HASH_MISMATCH",
            Self::TimestampInFuture => "TIMESTAMP_IN_FUTURE",
            Self::DocumentHashMismatch => "DOCUMENT_HASH_MISMATCH",
        }
    }
}

impl fmt::Display for ProofErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
