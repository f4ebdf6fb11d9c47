//! # Canonical Proof Form
//!
//! The byte string hashed into `integrity.proof_hash`: JSON of the proof in
//! field-declaration order, `integrity` omitted, and the signature image
//! replaced by the marker `[IMAGE_HASH:<signature.hash>]`.
//!
//! Builder and verifier both go through [`proof_hash`]; any divergence
//! between them would make every proof unverifiable.

use serde::Serialize;
use shared_crypto::sha256_hex;
use shared_types::{
    ClientTimestamp, DocumentRef, EnvironmentMetadata, SignatureKind, SignatureProof,
    SignerIdentity,
};

use super::errors::ProofError;

#[derive(Serialize)]
struct CanonicalSignature<'a> {
    kind: SignatureKind,
    image_bytes: String,
    hash: &'a str,
}

#[derive(Serialize)]
struct CanonicalProof<'a> {
    proof_id: &'a str,
    document: &'a DocumentRef,
    signer: &'a SignerIdentity,
    signature: CanonicalSignature<'a>,
    timestamp: &'a ClientTimestamp,
    metadata: &'a EnvironmentMetadata,
}

/// Marker standing in for the image payload.
pub fn image_marker(signature_hash: &str) -> String {
    format!("[IMAGE_HASH:{signature_hash}]")
}

/// Canonical serialization of `proof`.
pub fn canonical_bytes(proof: &SignatureProof) -> Result<Vec<u8>, ProofError> {
    let view = CanonicalProof {
        proof_id: &proof.proof_id,
        document: &proof.document,
        signer: &proof.signer,
        signature: CanonicalSignature {
            kind: proof.signature.kind,
            image_bytes: image_marker(&proof.signature.hash),
            hash: &proof.signature.hash,
        },
        timestamp: &proof.timestamp,
        metadata: &proof.metadata,
    };
    serde_json::to_vec(&view).map_err(|e| ProofError::Serialization(e.to_string()))
}

/// SHA-256 of the canonical serialization.
pub fn proof_hash(proof: &SignatureProof) -> Result<String, ProofError> {
    canonical_bytes(proof).map(|bytes| sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{IntegrityBlock, SignatureData};

    fn sample() -> SignatureProof {
        SignatureProof {
            proof_id: "SIG-1-ABCDEFGH".into(),
            document: DocumentRef {
                document_type: "lease".into(),
                id: "7".into(),
                hash: sha256_hex(b"doc"),
            },
            signer: SignerIdentity {
                name: "A".into(),
                email: "a@example.com".into(),
                profile_ref: None,
                identity_verified: false,
                identity_method: None,
            },
            signature: SignatureData {
                kind: SignatureKind::Typed,
                image_bytes: vec![0xAB; 4096],
                hash: sha256_hex(&[0xAB; 4096]),
            },
            timestamp: ClientTimestamp {
                iso8601: "1970-01-01T00:00:00.001Z".into(),
                unix_millis: 1,
                timezone: "UTC".into(),
            },
            metadata: EnvironmentMetadata {
                user_agent: "ua".into(),
                screen_descriptor: "1x1".into(),
                is_touch_device: false,
                ip: None,
                geolocation: None,
            },
            integrity: IntegrityBlock {
                algorithm: "SHA-256".into(),
                proof_hash: String::new(),
            },
        }
    }

    #[test]
    fn test_image_replaced_by_marker() {
        let proof = sample();
        let text = String::from_utf8(canonical_bytes(&proof).unwrap()).unwrap();
        assert!(text.contains(&image_marker(&proof.signature.hash)));
        assert!(text.len() < 2048, "raw image must not be embedded");
    }

    #[test]
    fn test_integrity_excluded() {
        let mut proof = sample();
        let before = proof_hash(&proof).unwrap();
        proof.integrity.proof_hash = "anything".into();
        assert_eq!(proof_hash(&proof).unwrap(), before);
    }

    #[test]
    fn test_image_bytes_do_not_affect_hash_directly() {
        // Only the image digest is covered; the image itself is bound via check 1.
        let mut proof = sample();
        let before = proof_hash(&proof).unwrap();
        proof.signature.image_bytes[0] ^= 0xFF;
        assert_eq!(proof_hash(&proof).unwrap(), before);
    }

    #[test]
    fn test_field_change_changes_hash() {
        let mut proof = sample();
        let before = proof_hash(&proof).unwrap();
        proof.signer.email = "b@example.com".into();
        assert_ne!(proof_hash(&proof).unwrap(), before);
    }
}
