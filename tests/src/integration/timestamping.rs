//! # Timestamping Over Real HTTP
//!
//! The `reqwest` transport against endpoints that never answer. No test
//! here needs network access to pass.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use sa_02_timestamping::{TimestampApi, TimestampClient, TsaConfig, FALLBACK_TSA_URL};
    use shared_types::TokenStatus;

    fn dead_authority(url: &str, timeout: Duration) -> TsaConfig {
        TsaConfig::new("dead", url, "Dead TSA").with_timeout(timeout)
    }

    #[tokio::test]
    async fn test_non_routable_authority_falls_back_within_bound() {
        let client = TimestampClient::http().unwrap();
        let config = dead_authority("http://10.255.255.1/tsr", Duration::from_secs(2));
        let hash = "a".repeat(64);

        let started = Instant::now();
        let result = client.request_timestamp(&hash, &config).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(result.success);
        assert!(result.fallback_used);
        assert_eq!(result.token.document_hash, hash);
        assert_eq!(result.token.status, TokenStatus::Fallback);
        assert_eq!(result.token.tsa_url, FALLBACK_TSA_URL);
        assert_eq!(result.token.provider, "Fallback local (Dead TSA indisponible)");
    }

    #[tokio::test]
    async fn test_refused_connection_falls_back() {
        let client = TimestampClient::http().unwrap();
        let config = dead_authority("http://127.0.0.1:1/tsr", Duration::from_secs(2));

        let result = client.request_timestamp(&"b".repeat(64), &config).await;
        assert!(result.fallback_used);
        assert!(result.token.provider.contains("Fallback"));
    }

    #[tokio::test]
    async fn test_failover_across_dead_authorities() {
        let client = TimestampClient::http().unwrap();
        let configs = [
            dead_authority("http://127.0.0.1:1/tsr", Duration::from_secs(1)),
            TsaConfig::new("other", "http://127.0.0.1:2/tsr", "Other TSA")
                .with_timeout(Duration::from_secs(1)),
        ];

        let result = client.request_with_failover(&"c".repeat(64), &configs).await;
        assert!(result.fallback_used);
        let error = result.error.unwrap();
        assert!(error.contains("Dead TSA") && error.contains("Other TSA"));
    }
}
