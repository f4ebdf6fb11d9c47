//! # Core Attestation Entities
//!
//! The two records produced at signing time and handed to the persistence
//! collaborator. Both are immutable once created.
//!
//! ## Clusters
//!
//! - **Proof**: `SignatureProof`, `DocumentRef`, `SignerIdentity`,
//!   `SignatureData`, `ClientTimestamp`, `EnvironmentMetadata`, `IntegrityBlock`
//! - **Timestamp**: `TimestampToken`, `TokenStatus`

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use std::fmt;

/// Digest algorithm label carried by every proof and token.
pub const HASH_ALGORITHM: &str = "SHA-256";

// =============================================================================
// CLUSTER A: THE PROOF
// =============================================================================

/// Tamper-evident record binding a signer, a document and a signature image
/// at a client-observed instant.
///
/// `integrity.proof_hash` covers every other field, with the raw signature
/// image replaced by its own digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureProof {
    /// Human-legible identifier, `SIG-<base36 millis>-<8 base36 chars>`.
    pub proof_id: String,
    /// The document that was presented for signature.
    pub document: DocumentRef,
    /// Who signed.
    pub signer: SignerIdentity,
    /// The signature image and its digest.
    pub signature: SignatureData,
    /// Client-observed signing time (not certified).
    pub timestamp: ClientTimestamp,
    /// Signing environment.
    pub metadata: EnvironmentMetadata,
    /// Self-hash over the rest of the proof.
    pub integrity: IntegrityBlock,
}

/// Identity and digest of the signed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document category (lease, inventory, mandate, ...).
    #[serde(rename = "type")]
    pub document_type: String,
    /// Identifier of the document in the owning application.
    pub id: String,
    /// SHA-256 of the exact bytes presented for signature.
    pub hash: String,
}

/// Signer identity as asserted by the calling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerIdentity {
    pub name: String,
    pub email: String,
    /// Reference to the signer's profile in the owning application.
    pub profile_ref: Option<String>,
    pub identity_verified: bool,
    /// How identity was verified (e.g. `email_otp`, `id_document`).
    pub identity_method: Option<String>,
}

/// How the signature image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    /// Hand-drawn on a canvas.
    Drawn,
    /// Typed name rendered as an image.
    Typed,
}

impl SignatureKind {
    /// Wire label (`drawn` / `typed`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drawn => "drawn",
            Self::Typed => "typed",
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature image payload and its digest.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
    pub kind: SignatureKind,
    /// Raw image payload, base64 on the wire.
    #[serde_as(as = "Base64")]
    pub image_bytes: Vec<u8>,
    /// SHA-256 of `image_bytes`.
    pub hash: String,
}

/// Client-observed signing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTimestamp {
    /// RFC 3339 rendering of `unix_millis`.
    pub iso8601: String,
    pub unix_millis: i64,
    /// IANA zone reported by the client.
    pub timezone: String,
}

/// Approximate signer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: f64,
    pub lon: f64,
    /// Radius in metres.
    pub accuracy: Option<f64>,
}

/// Environment in which the signature was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMetadata {
    pub user_agent: String,
    /// e.g. `1920x1080`
    pub screen_descriptor: String,
    pub is_touch_device: bool,
    pub ip: Option<String>,
    pub geolocation: Option<Geolocation>,
}

/// Self-hash of the proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityBlock {
    pub algorithm: String,
    pub proof_hash: String,
}

// =============================================================================
// CLUSTER B: THE TIMESTAMP
// =============================================================================

/// Outcome recorded on a timestamp token.
///
/// The timestamp client only emits `Granted` and `Fallback`; a refused or
/// deferred request falls back. `Rejection` and `Waiting` exist for tokens
/// recorded by other producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    /// Issued by a timestamp authority.
    Granted,
    /// Authority refused the request.
    Rejection,
    /// Authority asked the client to come back later.
    Waiting,
    /// Produced locally; not independently certified.
    Fallback,
}

impl TokenStatus {
    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Rejection => "rejection",
            Self::Waiting => "waiting",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamp attestation over a hash, real or local fallback.
///
/// A token with `status == Fallback` must never be presented as certified;
/// its `provider` always says so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampToken {
    /// Base64 of the authority reply, or of the local fallback structure.
    pub token: String,
    /// SHA-256 of the decoded token bytes.
    pub token_hash: String,
    /// The hash that was time-stamped.
    pub document_hash: String,
    pub hash_algorithm: String,
    /// RFC 3339 time claimed by the token.
    pub timestamp: String,
    /// Same instant as `timestamp`, in Unix seconds.
    pub timestamp_unix: i64,
    pub provider: String,
    pub tsa_url: String,
    pub status: TokenStatus,
    /// Anti-replay nonce sent with the request (32 hex chars).
    pub nonce: String,
    pub serial_number: Option<String>,
    pub policy_oid: Option<String>,
}

impl TimestampToken {
    /// True only for tokens issued by an authority.
    pub fn is_certified(&self) -> bool {
        self.status == TokenStatus::Granted
    }
}
