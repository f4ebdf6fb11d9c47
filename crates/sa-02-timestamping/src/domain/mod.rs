//! # Domain Layer
//!
//! Request encoding, fallback tokens and token checks. No I/O.
//! This is the inner layer of the hexagonal architecture.

pub mod codec;
pub mod config;
pub mod der;
pub mod entities;
pub mod errors;
pub mod fallback;
pub mod verifier;
