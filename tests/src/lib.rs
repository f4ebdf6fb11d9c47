//! # Signature Attestation Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs         # Proof, timestamp and certificate together
//!     ├── telemetry.rs     # Logging setup next to a foreign subscriber
//!     └── timestamping.rs  # Real HTTP transport against dead endpoints
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sa-tests
//! cargo test -p sa-tests integration::flows::
//! ```

pub mod integration;
