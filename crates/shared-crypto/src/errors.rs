//! Crypto error types.

use thiserror::Error;

/// Errors raised when decoding digests and other hex material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Input is not valid hexadecimal
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded material has the wrong length
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in characters
        expected: usize,
        /// Actual length in characters
        actual: usize,
    },
}
