//! # Domain Entities
//!
//! Inputs collected by the signing UI and the verification report.

use serde::{Deserialize, Serialize};
use shared_types::{Geolocation, SignatureKind};

use super::errors::ProofErrorCode;

/// The document being signed.
#[derive(Clone, Debug)]
pub struct DocumentInput {
    pub document_type: String,
    pub document_id: String,
    /// Exact rendered bytes presented to the signer.
    pub bytes: Vec<u8>,
}

/// Signer details asserted by the calling application.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SignerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_ref: Option<String>,
    #[serde(default)]
    pub identity_verified: bool,
    #[serde(default)]
    pub identity_method: Option<String>,
}

/// Client environment at signing time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub user_agent: String,
    pub screen_descriptor: String,
    #[serde(default)]
    pub is_touch_device: bool,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub geolocation: Option<Geolocation>,
    /// IANA zone of the client; `UTC` when absent.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Everything a signing event supplies.
#[derive(Clone, Debug)]
pub struct SigningRequest {
    pub document: DocumentInput,
    pub signer: SignerInfo,
    pub signature_kind: SignatureKind,
    pub signature_image: Vec<u8>,
    pub environment: EnvironmentInfo,
}

/// Result of verifying a proof. Every check runs; all failures are listed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofVerification {
    pub valid: bool,
    pub errors: Vec<ProofErrorCode>,
}

impl ProofVerification {
    /// Build a report from the accumulated failures.
    pub fn from_errors(errors: Vec<ProofErrorCode>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}
