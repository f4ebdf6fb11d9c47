//! # Local Fallback Timestamps
//!
//! When no authority answers, the signing workflow still gets a token. The
//! token carries a self-describing JSON payload (base64 on the wire) with an
//! integrity hash over `document_hash|nonce|timestamp|fallback`.
//!
//! The provider string always starts with `Fallback local` so a fallback
//! token can never be read as authority-issued.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use shared_crypto::{sha256_hex, ALGORITHM};
use shared_types::{iso8601_from_millis, TimestampToken, TokenStatus};

/// Type marker inside the payload.
pub const FALLBACK_TYPE: &str = "local_fallback";

/// `tsa_url` recorded on fallback tokens.
pub const FALLBACK_TSA_URL: &str = "local";

/// Marker every fallback provider string starts with.
pub const FALLBACK_PROVIDER_MARKER: &str = "Fallback local";

/// The structure base64-encoded into `TimestampToken::token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub document_hash: String,
    pub nonce: String,
    pub timestamp: String,
    pub integrity_hash: String,
    pub reason: String,
}

impl FallbackPayload {
    /// Decode a token's payload. `None` if it is not a fallback payload.
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = BASE64.decode(token).ok()?;
        let payload: Self = serde_json::from_slice(&bytes).ok()?;
        (payload.kind == FALLBACK_TYPE).then_some(payload)
    }

    /// Whether `integrity_hash` recomputes from the other fields.
    pub fn integrity_holds(&self) -> bool {
        integrity_hash(&self.document_hash, &self.nonce, &self.timestamp) == self.integrity_hash
    }
}

/// `sha256(document_hash|nonce|timestamp|fallback)`.
pub fn integrity_hash(document_hash: &str, nonce: &str, timestamp: &str) -> String {
    sha256_hex(format!("{document_hash}|{nonce}|{timestamp}|fallback").as_bytes())
}

/// Provider string naming the authority that could not be reached.
pub fn fallback_provider(attempted_provider_name: &str) -> String {
    format!("{FALLBACK_PROVIDER_MARKER} ({attempted_provider_name} indisponible)")
}

/// Build a local, explicitly non-certified token.
pub fn create_fallback(
    document_hash_hex: &str,
    nonce_hex: &str,
    attempted_provider_name: &str,
    failure_reason: &str,
    now_millis: i64,
) -> TimestampToken {
    let timestamp = iso8601_from_millis(now_millis);
    let payload = FallbackPayload {
        kind: FALLBACK_TYPE.to_string(),
        document_hash: document_hash_hex.to_string(),
        nonce: nonce_hex.to_string(),
        integrity_hash: integrity_hash(document_hash_hex, nonce_hex, &timestamp),
        timestamp: timestamp.clone(),
        reason: failure_reason.to_string(),
    };
    // Plain strings only; serialization cannot fail.
    let json = serde_json::to_vec(&payload).unwrap_or_default();

    TimestampToken {
        token: BASE64.encode(&json),
        token_hash: sha256_hex(&json),
        document_hash: document_hash_hex.to_string(),
        hash_algorithm: ALGORITHM.to_string(),
        timestamp,
        timestamp_unix: now_millis.div_euclid(1000),
        provider: fallback_provider(attempted_provider_name),
        tsa_url: FALLBACK_TSA_URL.to_string(),
        status: TokenStatus::Fallback,
        nonce: nonce_hex.to_string(),
        serial_number: None,
        policy_oid: None,
    }
}
