//! # Signature Attestation Telemetry
//!
//! Structured logging for the proof and timestamping crates, built on
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sa_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SA_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `SA_JSON_LOGS` | `false` | JSON lines output |
//! | `SA_CONSOLE_OUTPUT` | `true` | Emit logs at all |
//! | `SA_SERVICE_NAME` | `signature-attestation` | Name on the startup event |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_LOG_LEVEL};
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Logging already initialized")]
    AlreadyInitialized,

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        let config = TelemetryConfig::default().with_log_level("sa_admin=verbose");
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_second_init_reports_already_initialized() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        // Only this test installs a subscriber in this crate.
        let _ = init_logging(&config);
        assert_eq!(
            init_logging(&config),
            Err(TelemetryError::AlreadyInitialized)
        );
    }
}
