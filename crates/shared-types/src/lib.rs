//! # Shared Types Crate
//!
//! This crate contains the attestation records (`SignatureProof`,
//! `TimestampToken`) and the `TimeSource` port shared by the proof and
//! timestamping subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: records handed to persistence are defined here.
//! - **Immutability**: nothing in the workspace mutates a record after creation;
//!   a correction is a new record.

pub mod entities;
pub mod time;

pub use entities::*;
pub use time::{
    datetime_from_millis, iso8601_from_millis, FixedTimeSource, SystemTimeSource, TimeSource,
};
