//! # Domain Layer
//!
//! Pure proof logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod builder;
pub mod canonical;
pub mod certificate;
pub mod entities;
pub mod errors;
pub mod proof_id;
pub mod verifier;
