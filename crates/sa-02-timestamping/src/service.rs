//! # Timestamp Client Service
//!
//! Application service layer that implements the `TimestampApi` trait.
//!
//! ## Architecture
//!
//! - Implements the inbound port (`TimestampApi`)
//! - Talks to authorities through the outbound port (`TsaTransport`)
//! - Reads the clock through `TimeSource`
//!
//! ## Failure Handling
//!
//! Every authority failure (transport error, timeout, non-2xx status,
//! malformed reply, non-granted `PKIStatus`) is logged and converted into a
//! local fallback token. Callers always receive a token.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use shared_crypto::{sha256_hex, ALGORITHM};
use shared_types::{
    iso8601_from_millis, SystemTimeSource, TimeSource, TimestampToken, TokenStatus,
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::adapters::http::ReqwestTransport;
use crate::domain::codec;
use crate::domain::config::{TsaConfig, TsaRegistry};
use crate::domain::entities::{TimestampResult, TokenVerification};
use crate::domain::errors::TimestampError;
use crate::domain::fallback::create_fallback;
use crate::domain::verifier;
use crate::ports::inbound::TimestampApi;
use crate::ports::outbound::{TransportError, TsaHttpRequest, TsaTransport};

/// Provider name recorded when no authority was configured at all.
pub const NO_PROVIDER: &str = "aucune autorité";

/// Timestamp client.
pub struct TimestampClient<Tr: TsaTransport, C: TimeSource = SystemTimeSource> {
    transport: Tr,
    clock: C,
}

impl TimestampClient<ReqwestTransport, SystemTimeSource> {
    /// Client over HTTP, reading the system clock.
    pub fn http() -> Result<Self, TransportError> {
        Ok(Self::new(ReqwestTransport::new()?, SystemTimeSource))
    }
}

impl<Tr: TsaTransport, C: TimeSource> TimestampClient<Tr, C> {
    /// Create a new timestamp client.
    pub fn new(transport: Tr, clock: C) -> Self {
        Self { transport, clock }
    }

    /// One attempt against one authority.
    async fn attempt(
        &self,
        document_hash_hex: &str,
        nonce_hex: &str,
        config: &TsaConfig,
    ) -> Result<TimestampToken, TimestampError> {
        config.validate()?;
        let body = codec::build_request_with(
            document_hash_hex,
            nonce_hex,
            config.policy_oid.as_deref(),
            config.der_length,
        )?;

        let request = TsaHttpRequest {
            url: config.url.clone(),
            body,
            credentials: config.credentials.clone(),
            client_cert: config.client_cert.clone(),
            timeout: config.timeout,
        };
        let response =
            match tokio::time::timeout(config.timeout, self.transport.post_query(request)).await {
                Err(_) => return Err(unavailable(TransportError::Timeout(config.timeout))),
                Ok(Err(e)) => return Err(unavailable(e)),
                Ok(Ok(response)) => response,
            };

        if !response.is_success() {
            return Err(TimestampError::TsaUnavailable(format!(
                "HTTP status {}",
                response.status
            )));
        }
        if !response.has_reply_content_type() {
            warn!(
                tsa_url = %config.url,
                content_type = ?response.content_type,
                "Unexpected reply content type, inspecting body anyway"
            );
        }

        let status = codec::decode_response_status(&response.body);
        if let Some(pki) = status.pki_status.filter(|pki| !pki.is_granted()) {
            return Err(TimestampError::TsaUnavailable(format!(
                "rejected by authority (status {pki:?})"
            )));
        }
        if !status.structurally_valid {
            return Err(TimestampError::TsaUnavailable(format!(
                "malformed reply ({} bytes)",
                response.body.len()
            )));
        }

        let hints = codec::inspect_reply(&response.body, document_hash_hex);
        let millis = hints
            .gen_time
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|| self.clock.now_millis());

        Ok(TimestampToken {
            token: BASE64.encode(&response.body),
            token_hash: sha256_hex(&response.body),
            document_hash: document_hash_hex.to_string(),
            hash_algorithm: ALGORITHM.to_string(),
            timestamp: iso8601_from_millis(millis),
            timestamp_unix: millis.div_euclid(1000),
            provider: config.provider_name.clone(),
            tsa_url: config.url.clone(),
            // Non-granted statuses were turned into failures above.
            status: TokenStatus::Granted,
            nonce: nonce_hex.to_string(),
            serial_number: hints.serial_number,
            policy_oid: hints.policy_oid.or_else(|| config.policy_oid.clone()),
        })
    }
}

fn unavailable(error: TransportError) -> TimestampError {
    TimestampError::TsaUnavailable(error.to_string())
}

#[async_trait::async_trait]
impl<Tr: TsaTransport, C: TimeSource> TimestampApi for TimestampClient<Tr, C> {
    async fn request_timestamp(
        &self,
        document_hash_hex: &str,
        config: &TsaConfig,
    ) -> TimestampResult {
        self.request_with_failover(document_hash_hex, std::slice::from_ref(config))
            .await
    }

    async fn request_with_failover(
        &self,
        document_hash_hex: &str,
        configs: &[TsaConfig],
    ) -> TimestampResult {
        let mut failures = Vec::with_capacity(configs.len());
        let mut primary_nonce = None;

        for config in configs {
            let nonce = codec::generate_nonce();
            primary_nonce.get_or_insert_with(|| nonce.clone());
            let started = Instant::now();
            debug!(provider = %config.provider_name, tsa_url = %config.url, "Requesting timestamp");

            match self.attempt(document_hash_hex, &nonce, config).await {
                Ok(token) => {
                    info!(
                        provider = %config.provider_name,
                        document_hash = %document_hash_hex,
                        status = %token.status,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Timestamp granted"
                    );
                    return TimestampResult::granted(token);
                }
                Err(e) => {
                    warn!(
                        provider = %config.provider_name,
                        tsa_url = %config.url,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Timestamp authority failed"
                    );
                    failures.push(format!("{}: {e}", config.provider_name));
                }
            }
        }

        let provider = configs
            .first()
            .map(|config| config.provider_name.as_str())
            .unwrap_or(NO_PROVIDER);
        let reason = if failures.is_empty() {
            "no timestamp authority configured".to_string()
        } else {
            failures.join("; ")
        };
        // Same nonce as the request sent to the provider the token names.
        let nonce = primary_nonce.unwrap_or_else(codec::generate_nonce);
        let token = create_fallback(
            document_hash_hex,
            &nonce,
            provider,
            &reason,
            self.clock.now_millis(),
        );
        warn!(
            provider = %token.provider,
            document_hash = %document_hash_hex,
            "Using local fallback timestamp"
        );
        TimestampResult::fallback(token, reason)
    }

    async fn request_from_registry(
        &self,
        document_hash_hex: &str,
        registry: &TsaRegistry,
        override_name: Option<&str>,
    ) -> Result<TimestampResult, TimestampError> {
        let config = registry.resolve(override_name)?;
        Ok(self.request_timestamp(document_hash_hex, config).await)
    }

    fn verify_token(&self, token: &TimestampToken) -> TokenVerification {
        verifier::verify_token(token, self.clock.now_millis())
    }
}
