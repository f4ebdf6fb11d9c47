//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use shared_types::TimestampToken;

use crate::domain::config::{TsaConfig, TsaRegistry};
use crate::domain::entities::{TimestampResult, TokenVerification};
use crate::domain::errors::TimestampError;

/// Primary Timestamping API.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait::async_trait]
pub trait TimestampApi: Send + Sync {
    /// Timestamp `document_hash_hex` with one authority.
    ///
    /// Never fails: any authority problem yields a fallback token.
    async fn request_timestamp(&self, document_hash_hex: &str, config: &TsaConfig)
        -> TimestampResult;

    /// Try each authority in the given order; fall back only if all fail.
    async fn request_with_failover(
        &self,
        document_hash_hex: &str,
        configs: &[TsaConfig],
    ) -> TimestampResult;

    /// Timestamp with the registry's active authority, or `override_name`.
    ///
    /// # Errors
    /// * `TimestampError::Config` - `override_name` is not registered
    async fn request_from_registry(
        &self,
        document_hash_hex: &str,
        registry: &TsaRegistry,
        override_name: Option<&str>,
    ) -> Result<TimestampResult, TimestampError>;

    /// Structural checks on a stored token.
    fn verify_token(&self, token: &TimestampToken) -> TokenVerification;
}
