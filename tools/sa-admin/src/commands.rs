//! Command implementations.

use anyhow::{bail, Context, Result};
use sa_01_signature_proof::{
    DocumentInput, EnvironmentInfo, SignatureProofApi, SignatureProofService, SignerInfo,
    SigningRequest,
};
use sa_02_timestamping::{TimestampApi, TimestampClient, TsaRegistry, TsaTransport};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_crypto::{is_hex_digest, sha256_hex, ALGORITHM};
use shared_types::{SignatureKind, SignatureProof, TimeSource, TimestampToken};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin for `-`.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// `hash`: digest of a file or a literal string.
pub fn hash(file: Option<&Path>, text: Option<&str>) -> Result<Value> {
    let digest = match (file, text) {
        (Some(path), None) => sha256_hex(&read_bytes(path)?),
        (None, Some(text)) => sha256_hex(text.as_bytes()),
        _ => bail!("pass exactly one of --file or --text"),
    };
    Ok(json!({ "algorithm": ALGORITHM, "hash": digest }))
}

/// Inputs of the `sign` command.
pub struct SignArgs<'a> {
    pub document: &'a Path,
    pub document_type: &'a str,
    pub document_id: &'a str,
    pub image: &'a Path,
    pub kind: SignatureKind,
    pub signer: &'a Path,
    pub environment: Option<&'a Path>,
}

/// `sign`: build a proof from files on disk.
pub fn sign<T: TimeSource>(
    service: &SignatureProofService<T>,
    args: &SignArgs<'_>,
) -> Result<SignatureProof> {
    let signer: SignerInfo = read_json(args.signer)?;
    let environment: EnvironmentInfo = match args.environment {
        Some(path) => read_json(path)?,
        None => EnvironmentInfo::default(),
    };
    let request = SigningRequest {
        document: DocumentInput {
            document_type: args.document_type.to_string(),
            document_id: args.document_id.to_string(),
            bytes: read_bytes(args.document)?,
        },
        signer,
        signature_kind: args.kind,
        signature_image: read_bytes(args.image)?,
        environment,
    };
    Ok(service.build_proof(&request)?)
}

/// `verify-proof`: self-consistency, plus the document binding when given.
pub fn verify_proof<T: TimeSource>(
    service: &SignatureProofService<T>,
    proof: &SignatureProof,
    document: Option<&[u8]>,
) -> Value {
    let mut report = service.verify_proof(proof);
    if let Some(bytes) = document {
        let binding = service.verify_document(proof, bytes);
        report.errors.extend(binding.errors);
        report.valid = report.errors.is_empty();
    }
    json!(report)
}

/// Document hash argument: a hex digest or a file to hash.
pub fn document_hash(hash: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (hash, file) {
        (Some(hash), None) => {
            let hash = hash.trim().to_ascii_lowercase();
            if !is_hex_digest(&hash) {
                bail!("--hash must be 64 hex characters");
            }
            Ok(hash)
        }
        (None, Some(path)) => Ok(sha256_hex(&read_bytes(path)?)),
        _ => bail!("pass exactly one of --hash or --file"),
    }
}

/// `timestamp`: one authority, or every registered one in failover order.
pub async fn timestamp<Tr: TsaTransport, C: TimeSource>(
    client: &TimestampClient<Tr, C>,
    registry: &TsaRegistry,
    document_hash: &str,
    provider: Option<&str>,
    failover: bool,
) -> Result<Value> {
    let result = if failover {
        let mut order = registry.failover_order();
        if let Some(name) = provider {
            let first = registry.resolve(Some(name))?.clone();
            order.retain(|config| config.name != first.name);
            order.insert(0, first);
        }
        client.request_with_failover(document_hash, &order).await
    } else {
        client
            .request_from_registry(document_hash, registry, provider)
            .await?
    };
    Ok(json!(result))
}

/// `verify-token`
pub fn verify_token<Tr: TsaTransport, C: TimeSource>(
    client: &TimestampClient<Tr, C>,
    token: &TimestampToken,
) -> Value {
    json!(client.verify_token(token))
}

/// `providers`: registered authorities without secrets.
pub fn providers(registry: &TsaRegistry) -> Value {
    let entries: Vec<Value> = registry
        .iter()
        .map(|config| {
            json!({
                "name": config.name,
                "provider_name": config.provider_name,
                "url": config.url,
                "active": config.name == registry.active_name(),
                "timeout_ms": config.timeout.as_millis() as u64,
                "authenticated": config.credentials.is_some(),
                "client_cert": config.client_cert.is_some(),
                "policy_oid": config.policy_oid,
            })
        })
        .collect();
    Value::Array(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_02_timestamping::{TransportError, TsaHttpRequest, TsaHttpResponse};
    use shared_types::FixedTimeSource;

    const NOW: i64 = 1_700_000_000_000;

    struct Unreachable;

    #[async_trait::async_trait]
    impl TsaTransport for Unreachable {
        async fn post_query(
            &self,
            _request: TsaHttpRequest,
        ) -> Result<TsaHttpResponse, TransportError> {
            Err(TransportError::Connect("refused".into()))
        }
    }

    #[test]
    fn test_hash_text() {
        let value = hash(None, Some("CONTRAT-123")).unwrap();
        assert_eq!(value["hash"], sha256_hex(b"CONTRAT-123"));
        assert_eq!(value["algorithm"], "SHA-256");
        assert!(hash(None, None).is_err());
    }

    #[test]
    fn test_document_hash_argument() {
        let upper = "A".repeat(64);
        assert_eq!(document_hash(Some(&upper), None).unwrap(), "a".repeat(64));
        assert!(document_hash(Some("abc"), None).is_err());
    }

    #[test]
    fn test_providers_hide_secrets() {
        let registry = TsaRegistry::from_lookup(|key| match key {
            "TSA_USERNAME" => Some("user".into()),
            "TSA_PASSWORD" => Some("secret".into()),
            _ => None,
        })
        .unwrap();
        let listing = providers(&registry).to_string();
        assert!(listing.contains("freetsa"));
        assert!(!listing.contains("secret"));
    }

    #[tokio::test]
    async fn test_timestamp_failover_falls_back() {
        let client = TimestampClient::new(Unreachable, FixedTimeSource(NOW));
        let registry = TsaRegistry::with_presets();
        let value = timestamp(&client, &registry, &"a".repeat(64), Some("certum"), true)
            .await
            .unwrap();
        assert_eq!(value["fallback_used"], true);
        assert_eq!(
            value["token"]["provider"],
            "Fallback local (Certum indisponible)"
        );
    }

    #[tokio::test]
    async fn test_timestamp_unknown_provider_is_error() {
        let client = TimestampClient::new(Unreachable, FixedTimeSource(NOW));
        let registry = TsaRegistry::with_presets();
        assert!(
            timestamp(&client, &registry, &"a".repeat(64), Some("nope"), false)
                .await
                .is_err()
        );
    }
}
