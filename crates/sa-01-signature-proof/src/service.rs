//! # Signature Proof Service
//!
//! Application service layer that implements the `SignatureProofApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`SignatureProofApi`)
//! - Reads the clock through `TimeSource`
//! - Delegates hashing and formatting to the domain layer

use shared_types::{SignatureProof, SystemTimeSource, TimeSource, TimestampToken};
use tracing::{info, warn};

use crate::domain::entities::{ProofVerification, SigningRequest};
use crate::domain::errors::ProofError;
use crate::domain::{builder, certificate, verifier};
use crate::ports::inbound::SignatureProofApi;

/// Signature Proof Service.
pub struct SignatureProofService<T: TimeSource = SystemTimeSource> {
    clock: T,
}

impl SignatureProofService<SystemTimeSource> {
    /// Service reading the system clock.
    pub fn system() -> Self {
        Self::new(SystemTimeSource)
    }
}

impl<T: TimeSource> SignatureProofService<T> {
    /// Create a new signature proof service.
    pub fn new(clock: T) -> Self {
        Self { clock }
    }
}

impl<T: TimeSource> SignatureProofApi for SignatureProofService<T> {
    fn build_proof(&self, request: &SigningRequest) -> Result<SignatureProof, ProofError> {
        let proof = builder::build_proof(request, self.clock.now_millis()).inspect_err(|e| {
            warn!(
                document_id = %request.document.document_id,
                error = %e,
                "Rejected signing request"
            )
        })?;
        info!(
            proof_id = %proof.proof_id,
            document_type = %proof.document.document_type,
            document_hash = %proof.document.hash,
            "Signature proof built"
        );
        Ok(proof)
    }

    fn verify_proof(&self, proof: &SignatureProof) -> ProofVerification {
        let report = verifier::verify_proof(proof, self.clock.now_millis());
        if !report.valid {
            warn!(proof_id = %proof.proof_id, errors = ?report.errors, "Proof verification failed");
        }
        report
    }

    fn verify_document(&self, proof: &SignatureProof, document_bytes: &[u8]) -> ProofVerification {
        let report = verifier::verify_document(proof, document_bytes);
        if !report.valid {
            warn!(proof_id = %proof.proof_id, "Presented document does not match proof");
        }
        report
    }

    fn render_certificate(
        &self,
        proof: &SignatureProof,
        token: Option<&TimestampToken>,
    ) -> String {
        certificate::render(proof, token)
    }
}
