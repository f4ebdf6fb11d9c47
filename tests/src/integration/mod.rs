//! Cross-crate integration tests.

pub mod flows;
pub mod telemetry;
pub mod timestamping;
