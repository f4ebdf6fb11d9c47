//! # Timestamping Subsystem (SA-02)
//!
//! Obtains RFC 3161-shaped timestamps for document hashes from external
//! timestamp authorities, with a local non-certified fallback.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Request encoding, reply inspection,
//!   fallback tokens, token checks, authority configuration
//! - **Ports Layer** (`ports/`): `TimestampApi` inbound, `TsaTransport` outbound
//! - **Adapters Layer** (`adapters/`): `reqwest` transport
//! - **Service Layer** (`service.rs`): `TimestampClient`
//!
//! ## Trust Notes
//!
//! - Replies are checked structurally only; the authority signature inside
//!   the token is not verified here
//! - Fallback tokens are always marked (`status = fallback`, provider
//!   starting with `Fallback local`) and never pass as certified

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::http::ReqwestTransport;
pub use domain::codec::{
    build_request, build_request_with, decode_response_status, generate_nonce, inspect_reply,
    NONCE_BYTES, SHA256_OID,
};
pub use domain::config::{presets, TsaConfig, TsaCredentials, TsaRegistry, DEFAULT_TIMEOUT};
pub use domain::der::DerLengthForm;
pub use domain::entities::{
    PkiStatus, ReplyHints, ResponseStatus, TimestampResult, TokenVerification,
};
pub use domain::errors::{ConfigError, TimestampError};
pub use domain::fallback::{
    create_fallback, FallbackPayload, FALLBACK_PROVIDER_MARKER, FALLBACK_TSA_URL,
};
pub use domain::verifier::verify_token;
pub use ports::inbound::TimestampApi;
pub use ports::outbound::{TransportError, TsaHttpRequest, TsaHttpResponse, TsaTransport};
pub use service::TimestampClient;
