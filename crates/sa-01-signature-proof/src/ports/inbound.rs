//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use shared_types::{SignatureProof, TimestampToken};

use crate::domain::entities::{ProofVerification, SigningRequest};
use crate::domain::errors::ProofError;

/// Primary Signature Proof API.
///
/// Implementations must be thread-safe (`Send + Sync`); concurrent signing
/// events each run their own call chain.
pub trait SignatureProofApi: Send + Sync {
    /// Build a proof for a signing event.
    ///
    /// # Errors
    /// * `ProofError::InvalidInput` - the caller must not persist anything
    fn build_proof(&self, request: &SigningRequest) -> Result<SignatureProof, ProofError>;

    /// Recompute every digest of a stored proof.
    fn verify_proof(&self, proof: &SignatureProof) -> ProofVerification;

    /// Check presented document bytes against the proof.
    fn verify_document(&self, proof: &SignatureProof, document_bytes: &[u8]) -> ProofVerification;

    /// Render the plain-text attestation.
    fn render_certificate(&self, proof: &SignatureProof, token: Option<&TimestampToken>)
        -> String;
}
