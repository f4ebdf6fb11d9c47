//! # Timestamping Errors
//!
//! Only encoding and configuration errors ever reach a caller. Authority
//! failures are turned into fallback tokens by the client.

use thiserror::Error;

/// Errors that can occur while preparing or obtaining a timestamp.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// Document hash is not 64 hex characters
    #[error("Invalid document hash: {0}")]
    InvalidHash(String),

    /// Nonce is not 32 hex characters
    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    /// Request could not be encoded
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Authority unreachable, timed out, refused, or replied with garbage
    #[error("TSA unavailable: {0}")]
    TsaUnavailable(String),

    /// Configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No authority registered under this name
    #[error("Unknown TSA provider: {0}")]
    UnknownProvider(String),

    /// Authority has no URL
    #[error("TSA provider {0} has no URL")]
    MissingUrl(String),

    /// Timeout is zero or unparsable
    #[error("Invalid TSA timeout: {0}")]
    InvalidTimeout(String),

    /// Policy is not a dotted-decimal object identifier
    #[error("Invalid policy OID: {0}")]
    InvalidPolicyOid(String),

    /// Client certificate could not be read
    #[error("Client certificate unreadable: {0}")]
    ClientCert(String),
}
