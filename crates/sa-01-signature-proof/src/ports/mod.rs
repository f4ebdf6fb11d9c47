//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that signing workflows call
//!
//! The only driven dependency is the clock, `shared_types::TimeSource`.

pub mod inbound;
