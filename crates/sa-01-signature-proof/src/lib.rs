//! # Signature Proof Subsystem (SA-01)
//!
//! Produces and checks tamper-evident proofs that a signer applied a
//! signature to a document at a client-observed instant.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure hashing and formatting, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to the clock
//!
//! ## Integrity Notes
//!
//! - **Image binding**: the raw image is hashed into `signature.hash`; the
//!   proof hash covers that digest, not the image, so its input stays small
//! - **Self-hash**: `integrity.proof_hash` covers every field except itself
//! - **Clock skew**: client timestamps up to 60 s in the future are tolerated

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::builder::build_proof;
pub use domain::canonical::{canonical_bytes, image_marker, proof_hash};
pub use domain::certificate::render as render_certificate;
pub use domain::entities::{
    DocumentInput, EnvironmentInfo, ProofVerification, SignerInfo, SigningRequest,
};
pub use domain::errors::{ProofError, ProofErrorCode};
pub use domain::proof_id::{generate_proof_id, is_valid_proof_id};
pub use domain::verifier::{verify_document, verify_proof, CLOCK_SKEW_TOLERANCE_MS};
pub use ports::inbound::SignatureProofApi;
pub use service::SignatureProofService;
