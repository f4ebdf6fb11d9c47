//! # Outbound Ports (Driven Ports / SPI)
//!
//! The single blocking dependency of the timestamping subsystem: an HTTP
//! POST to a timestamp authority.

use std::time::Duration;
use thiserror::Error;

use crate::domain::config::TsaCredentials;

/// Content type of an encoded request.
pub const TIMESTAMP_QUERY_CONTENT_TYPE: &str = "application/timestamp-query";

/// Content type a compliant authority replies with.
pub const TIMESTAMP_REPLY_CONTENT_TYPE: &str = "application/timestamp-reply";

/// Error from the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No reply within the bound
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other HTTP-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP client could not be configured
    #[error("Client configuration error: {0}")]
    Client(String),
}

/// An encoded request addressed to one authority.
#[derive(Debug, Clone)]
pub struct TsaHttpRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub credentials: Option<TsaCredentials>,
    /// PEM client identity.
    pub client_cert: Option<String>,
    pub timeout: Duration,
}

/// Raw reply from an authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsaHttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TsaHttpResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the declared content type is the timestamp reply type.
    pub fn has_reply_content_type(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(TIMESTAMP_REPLY_CONTENT_TYPE))
    }
}

/// Transport to timestamp authorities.
///
/// Implementations must honour `request.timeout`; the client enforces the
/// same bound again around the call.
#[async_trait::async_trait]
pub trait TsaTransport: Send + Sync {
    /// POST `request.body` to `request.url` as `application/timestamp-query`.
    ///
    /// # Errors
    /// * `TransportError::Timeout` - no reply within `request.timeout`
    /// * `TransportError::Connect` - authority unreachable
    async fn post_query(&self, request: TsaHttpRequest) -> Result<TsaHttpResponse, TransportError>;
}
