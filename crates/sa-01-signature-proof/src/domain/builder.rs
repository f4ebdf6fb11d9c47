//! # Proof Builder
//!
//! Assembles a `SignatureProof` from the signing inputs. Pure computation:
//! the only outside reads are the supplied instant and the CSPRNG behind the
//! proof identifier suffix.

use shared_crypto::{sha256_hex, ALGORITHM};
use shared_types::{
    iso8601_from_millis, ClientTimestamp, DocumentRef, EnvironmentMetadata, IntegrityBlock,
    SignatureData, SignatureProof, SignerIdentity,
};

use super::canonical;
use super::entities::SigningRequest;
use super::errors::ProofError;
use super::proof_id::generate_proof_id;

/// Timezone recorded when the client did not report one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Build a proof for `request` observed at `now_millis`.
///
/// # Errors
/// * `ProofError::InvalidInput` - an empty document, image, identifier or
///   signer field, or an email without `@`
pub fn build_proof(request: &SigningRequest, now_millis: i64) -> Result<SignatureProof, ProofError> {
    validate(request)?;

    let document_hash = sha256_hex(&request.document.bytes);
    let signature_hash = sha256_hex(&request.signature_image);
    let env = &request.environment;

    let mut proof = SignatureProof {
        proof_id: generate_proof_id(now_millis),
        document: DocumentRef {
            document_type: request.document.document_type.clone(),
            id: request.document.document_id.clone(),
            hash: document_hash,
        },
        signer: SignerIdentity {
            name: request.signer.name.clone(),
            email: request.signer.email.clone(),
            profile_ref: request.signer.profile_ref.clone(),
            identity_verified: request.signer.identity_verified,
            identity_method: request.signer.identity_method.clone(),
        },
        signature: SignatureData {
            kind: request.signature_kind,
            image_bytes: request.signature_image.clone(),
            hash: signature_hash,
        },
        timestamp: ClientTimestamp {
            iso8601: iso8601_from_millis(now_millis),
            unix_millis: now_millis,
            timezone: env
                .timezone
                .clone()
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        },
        metadata: EnvironmentMetadata {
            user_agent: env.user_agent.clone(),
            screen_descriptor: env.screen_descriptor.clone(),
            is_touch_device: env.is_touch_device,
            ip: env.ip.clone(),
            geolocation: env.geolocation,
        },
        integrity: IntegrityBlock {
            algorithm: ALGORITHM.to_string(),
            proof_hash: String::new(),
        },
    };

    proof.integrity.proof_hash = canonical::proof_hash(&proof)?;
    Ok(proof)
}

fn validate(request: &SigningRequest) -> Result<(), ProofError> {
    let required = [
        (request.document.bytes.is_empty(), "document bytes are empty"),
        (request.signature_image.is_empty(), "signature image is empty"),
        (
            request.document.document_type.trim().is_empty(),
            "document type is empty",
        ),
        (
            request.document.document_id.trim().is_empty(),
            "document id is empty",
        ),
        (request.signer.name.trim().is_empty(), "signer name is empty"),
        (!request.signer.email.contains('@'), "signer email is malformed"),
    ];
    match required.iter().find(|(failed, _)| *failed) {
        Some((_, reason)) => Err(ProofError::InvalidInput((*reason).to_string())),
        None => Ok(()),
    }
}
