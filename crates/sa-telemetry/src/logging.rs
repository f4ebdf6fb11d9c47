//! Subscriber installation.
//!
//! Output goes to stderr so command output on stdout stays parseable.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{TelemetryConfig, TelemetryError};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber described by `config`.
///
/// # Errors
/// * `TelemetryError::InvalidFilter` - `log_level` is not a valid directive
/// * `TelemetryError::AlreadyInitialized` - an earlier call installed the subscriber
/// * `TelemetryError::Init` - some other global subscriber is already installed
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(format!("{}: {e}", config.log_level)))?;

    if INITIALIZED.load(Ordering::SeqCst) {
        return Err(TelemetryError::AlreadyInitialized);
    }

    let fmt_layer = if !config.console_output {
        None
    } else if config.json_logs {
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed(),
        )
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed(),
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;
    INITIALIZED.store(true, Ordering::SeqCst);

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}
