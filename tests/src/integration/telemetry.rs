//! # Logging Setup Next To A Foreign Subscriber
//!
//! The only test in this crate that touches the global subscriber.

#[cfg(test)]
mod tests {
    use sa_telemetry::{init_logging, TelemetryConfig, TelemetryError};
    use tracing::subscriber::{set_global_default, NoSubscriber};

    #[test]
    fn test_foreign_subscriber_is_not_reported_as_ours() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        // Stands in for a subscriber installed by another library.
        let _ = set_global_default(NoSubscriber::default());

        for _ in 0..2 {
            assert!(matches!(
                init_logging(&config),
                Err(TelemetryError::Init(_))
            ));
        }
    }
}
