//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that signing workflows call
//! - **Outbound (Driven)**: The network transport to timestamp authorities

pub mod inbound;
pub mod outbound;
