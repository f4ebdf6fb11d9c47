//! # Proof Verifier
//!
//! Recomputes the digests of a stored proof. All checks run so that every
//! violation is reported, not just the first.

use shared_crypto::sha256_hex;
use shared_types::SignatureProof;

use super::canonical;
use super::entities::ProofVerification;
use super::errors::ProofErrorCode;

/// Tolerated client clock skew.
pub const CLOCK_SKEW_TOLERANCE_MS: i64 = 60_000;

/// Verify a proof against the verification instant `now_millis`.
///
/// Checks:
/// 1. `signature.hash == sha256(signature.image_bytes)`
/// 2. `integrity.proof_hash == sha256(canonical form)`
/// 3. `timestamp.unix_millis <= now + 60 s`
pub fn verify_proof(proof: &SignatureProof, now_millis: i64) -> ProofVerification {
    let mut errors = Vec::new();

    if sha256_hex(&proof.signature.image_bytes) != proof.signature.hash {
        errors.push(ProofErrorCode::SignatureHashMismatch);
    }

    match canonical::proof_hash(proof) {
        Ok(hash) if hash == proof.integrity.proof_hash => {}
        _ => errors.push(ProofErrorCode::ProofHashMismatch),
    }

    if proof.timestamp.unix_millis > now_millis.saturating_add(CLOCK_SKEW_TOLERANCE_MS) {
        errors.push(ProofErrorCode::TimestampInFuture);
    }

    ProofVerification::from_errors(errors)
}

/// Check that `document_bytes` are the bytes the proof was built over.
pub fn verify_document(proof: &SignatureProof, document_bytes: &[u8]) -> ProofVerification {
    let errors = if sha256_hex(document_bytes) == proof.document.hash {
        Vec::new()
    } else {
        vec![ProofErrorCode::DocumentHashMismatch]
    };
    ProofVerification::from_errors(errors)
}
