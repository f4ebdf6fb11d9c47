//! # Integration Test Flows
//!
//! A signing event end to end: the proof is built, its document hash is
//! timestamped through a mock authority, the token is checked, and the
//! certificate is rendered from both.
//!
//! ## Flow Tested:
//!
//! 1. **Proof (SA-01)**: build, verify, bind to the document bytes
//! 2. **Timestamp (SA-02)**: granted and fallback paths over `TsaTransport`
//! 3. **Certificate (SA-01)**: rendering with each kind of token

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use std::time::Duration;

    use sa_01_signature_proof::{
        is_valid_proof_id, DocumentInput, EnvironmentInfo, ProofErrorCode, SignatureProofApi,
        SignatureProofService, SignerInfo, SigningRequest,
    };
    use sa_02_timestamping::{
        TimestampApi, TimestampClient, TransportError, TsaConfig, TsaHttpRequest,
        TsaHttpResponse, TsaTransport,
    };
    use shared_crypto::sha256_hex;
    use shared_types::{FixedTimeSource, Geolocation, SignatureKind, SignatureProof, TokenStatus};

    const NOW: i64 = 1_700_000_000_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn contract_request() -> SigningRequest {
        SigningRequest {
            document: DocumentInput {
                document_type: "contrat".into(),
                document_id: "CONTRAT-123".into(),
                bytes: b"CONTRAT-123".to_vec(),
            },
            signer: SignerInfo {
                name: "Jean Dupont".into(),
                email: "jean@example.com".into(),
                profile_ref: None,
                identity_verified: true,
                identity_method: None,
            },
            signature_kind: SignatureKind::Drawn,
            signature_image: b"base64-blob-A".to_vec(),
            environment: EnvironmentInfo {
                user_agent: "Mozilla/5.0".into(),
                screen_descriptor: "1920x1080".into(),
                is_touch_device: false,
                ip: Some("203.0.113.7".into()),
                geolocation: Some(Geolocation {
                    lat: 48.8566,
                    lon: 2.3522,
                    accuracy: None,
                }),
                timezone: Some("Europe/Paris".into()),
            },
        }
    }

    fn proofs() -> SignatureProofService<FixedTimeSource> {
        SignatureProofService::new(FixedTimeSource(NOW))
    }

    /// Authority that answers every query with the same reply.
    struct StaticAuthority(Result<TsaHttpResponse, TransportError>);

    #[async_trait::async_trait]
    impl TsaTransport for StaticAuthority {
        async fn post_query(
            &self,
            _request: TsaHttpRequest,
        ) -> Result<TsaHttpResponse, TransportError> {
            self.0.clone()
        }
    }

    /// Minimal granted reply: `PKIStatusInfo { status 0 }` plus an opaque token.
    fn granted_reply() -> Vec<u8> {
        let mut reply = vec![0x30, 0x0F, 0x30, 0x03, 0x02, 0x01, 0x00, 0x30, 0x08];
        reply.extend_from_slice(&[0x04, 0x06, 1, 2, 3, 4, 5, 6]);
        reply
    }

    fn timestamps(
        reply: Result<TsaHttpResponse, TransportError>,
    ) -> TimestampClient<StaticAuthority, FixedTimeSource> {
        TimestampClient::new(StaticAuthority(reply), FixedTimeSource(NOW + 1_000))
    }

    fn authority() -> TsaConfig {
        TsaConfig::new("freetsa", "https://freetsa.org/tsr", "FreeTSA")
    }

    // =============================================================================
    // INTEGRATION TESTS: PROOF
    // =============================================================================

    #[test]
    fn test_contract_proof_is_valid() {
        let service = proofs();
        let proof = service.build_proof(&contract_request()).unwrap();

        assert!(is_valid_proof_id(&proof.proof_id), "{}", proof.proof_id);
        let (prefix, rest) = proof.proof_id.split_at(4);
        assert_eq!(prefix, "SIG-");
        let (millis, suffix) = rest.rsplit_once('-').unwrap();
        assert!(!millis.is_empty());
        assert_eq!(suffix.len(), 8);
        assert!(proof
            .proof_id
            .bytes()
            .all(|b| b == b'-' || b.is_ascii_digit() || b.is_ascii_uppercase()));

        let report = service.verify_proof(&proof);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(service.verify_document(&proof, b"CONTRAT-123").valid);
    }

    #[test]
    fn test_proof_survives_json_storage() {
        let service = proofs();
        let mut request = contract_request();
        request.environment.geolocation = Some(Geolocation {
            lat: 42.665364527375004,
            lon: 2.894305741012213,
            accuracy: Some(17.482999801635742),
        });
        let proof = service.build_proof(&request).unwrap();

        let stored = serde_json::to_string(&proof).unwrap();
        let loaded: SignatureProof = serde_json::from_str(&stored).unwrap();
        assert_eq!(loaded, proof);
        assert!(service.verify_proof(&loaded).valid);
    }

    #[test]
    fn test_tampering_after_storage_is_detected() {
        let service = proofs();
        let proof = service.build_proof(&contract_request()).unwrap();

        let mut value = serde_json::to_value(&proof).unwrap();
        value["signer"]["email"] = "mallory@example.com".into();
        let tampered: SignatureProof = serde_json::from_value(value).unwrap();
        assert_eq!(
            service.verify_proof(&tampered).errors,
            vec![ProofErrorCode::ProofHashMismatch]
        );

        assert_eq!(
            service.verify_document(&proof, b"CONTRAT-124").errors,
            vec![ProofErrorCode::DocumentHashMismatch]
        );
    }

    // =============================================================================
    // INTEGRATION TESTS: PROOF → TIMESTAMP → CERTIFICATE
    // =============================================================================

    #[tokio::test]
    async fn test_granted_timestamp_for_proof() {
        let proof = proofs().build_proof(&contract_request()).unwrap();
        let client = timestamps(Ok(TsaHttpResponse {
            status: 200,
            content_type: Some("application/timestamp-reply".into()),
            body: granted_reply(),
        }));

        let result = client
            .request_timestamp(&proof.document.hash, &authority())
            .await;
        assert!(result.success);
        assert!(!result.fallback_used);
        assert_eq!(result.token.document_hash, proof.document.hash);
        assert_eq!(result.token.status, TokenStatus::Granted);
        assert_eq!(
            result.token.token_hash,
            sha256_hex(&BASE64.decode(&result.token.token).unwrap())
        );
        assert!(client.verify_token(&result.token).valid);

        let certificate = proofs().render_certificate(&proof, Some(&result.token));
        assert!(certificate.contains("FreeTSA"));
        assert!(certificate.contains(&proof.proof_id));
        assert!(!certificate.contains("NON CERTIFIÉ"));
    }

    #[tokio::test]
    async fn test_http_500_yields_marked_fallback() {
        let proof = proofs().build_proof(&contract_request()).unwrap();
        let client = timestamps(Ok(TsaHttpResponse {
            status: 500,
            content_type: Some("text/plain".into()),
            body: b"Internal Server Error".to_vec(),
        }));

        let result = client
            .request_timestamp(&proof.document.hash, &authority())
            .await;
        assert!(result.success);
        assert!(result.fallback_used);
        assert!(result.error.is_some());
        assert!(result.token.provider.contains("Fallback"));
        assert_eq!(result.token.status, TokenStatus::Fallback);

        let report = client.verify_token(&result.token);
        assert!(report.valid);
        assert!(!report.warnings.is_empty());

        let certificate = proofs().render_certificate(&proof, Some(&result.token));
        assert!(certificate.contains("NON CERTIFIÉ"));
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback_for_same_hash() {
        let client = timestamps(Err(TransportError::Timeout(Duration::from_secs(10))));
        let hash = "a".repeat(64);
        let result = client.request_timestamp(&hash, &authority()).await;
        assert!(result.fallback_used);
        assert_eq!(result.token.document_hash, hash);
        assert_eq!(result.token.timestamp_unix, (NOW + 1_000) / 1000);
    }

    #[test]
    fn test_certificate_without_token() {
        let service = proofs();
        let proof = service.build_proof(&contract_request()).unwrap();
        let certificate = service.render_certificate(&proof, None);
        assert!(certificate.contains("Jean Dupont"));
        assert!(certificate.contains(&proof.integrity.proof_hash));
    }
}
