//! # Timestamp Token Verifier
//!
//! Lightweight sanity checks on any token, real or fallback, without the
//! issuing authority's certificate. Every check runs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use shared_crypto::is_hex_digest;
use shared_types::{TimestampToken, TokenStatus};
use std::collections::BTreeMap;

use super::der;
use super::entities::TokenVerification;
use super::fallback::FallbackPayload;

/// Check names, in report order.
pub const CHECK_TOKEN_PRESENT: &str = "token_present";
pub const CHECK_HASH_FORMAT: &str = "hash_format";
pub const CHECK_NOT_FUTURE: &str = "not_future";
pub const CHECK_NOT_TOO_OLD: &str = "not_too_old";
pub const CHECK_NONCE_PRESENT: &str = "nonce_present";

/// Tolerated skew for timestamps ahead of the verifier's clock.
pub const MAX_FUTURE_SKEW_SECS: i64 = 60;

/// Oldest acceptable token age.
pub const MAX_AGE_SECS: i64 = 365 * 24 * 60 * 60;

/// Shortest acceptable nonce.
pub const MIN_NONCE_LEN: usize = 16;

/// Verify `token` against the verification instant `now_millis`.
pub fn verify_token(token: &TimestampToken, now_millis: i64) -> TokenVerification {
    let now_secs = now_millis.div_euclid(1000);
    let hash_ok = is_hex_digest(&token.document_hash);

    let checks: BTreeMap<String, bool> = [
        (CHECK_TOKEN_PRESENT, !token.token.trim().is_empty()),
        (CHECK_HASH_FORMAT, hash_ok),
        (
            CHECK_NOT_FUTURE,
            token.timestamp_unix <= now_secs.saturating_add(MAX_FUTURE_SKEW_SECS),
        ),
        (
            CHECK_NOT_TOO_OLD,
            token.timestamp_unix >= now_secs.saturating_sub(MAX_AGE_SECS),
        ),
        (CHECK_NONCE_PRESENT, token.nonce.len() >= MIN_NONCE_LEN),
    ]
    .into_iter()
    .map(|(name, ok)| (name.to_string(), ok))
    .collect();

    let mut warnings = Vec::new();
    if token.status == TokenStatus::Fallback {
        warnings.push(format!(
            "Local fallback timestamp, not certified by a timestamp authority ({})",
            token.provider
        ));
    }
    if !hash_ok {
        warnings.push(format!(
            "Document hash is not a 64-character lowercase hex digest: {:?}",
            token.document_hash
        ));
    }
    warnings.extend(payload_warnings(token));

    TokenVerification {
        valid: checks.values().all(|ok| *ok),
        checks,
        warnings,
    }
}

fn payload_warnings(token: &TimestampToken) -> Vec<String> {
    if token.token.trim().is_empty() {
        return Vec::new();
    }
    match token.status {
        TokenStatus::Fallback => match FallbackPayload::decode(&token.token) {
            None => vec!["Fallback payload could not be decoded".to_string()],
            Some(payload) => {
                let mut warnings = Vec::new();
                if !payload.integrity_holds() {
                    warnings.push("Fallback payload integrity hash does not match".to_string());
                }
                if payload.document_hash != token.document_hash {
                    warnings.push("Fallback payload names a different document hash".to_string());
                }
                warnings
            }
        },
        _ => match BASE64.decode(token.token.trim()) {
            Ok(bytes) if bytes.first() == Some(&der::TAG_SEQUENCE) => Vec::new(),
            Ok(_) => vec!["Token payload does not start with a DER SEQUENCE".to_string()],
            Err(_) => vec!["Token payload is not valid base64".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fallback::create_fallback;

    const NOW: i64 = 1_700_000_000_000;
    const NOW_SECS: i64 = NOW / 1000;

    fn granted(timestamp_unix: i64) -> TimestampToken {
        TimestampToken {
            token: BASE64.encode([0x30, 0x03, 0x02, 0x01, 0x00]),
            token_hash: "0".repeat(64),
            document_hash: "a".repeat(64),
            hash_algorithm: "SHA-256".into(),
            timestamp: String::new(),
            timestamp_unix,
            provider: "FreeTSA".into(),
            tsa_url: "https://freetsa.org/tsr".into(),
            status: TokenStatus::Granted,
            nonce: "0123456789abcdef0123456789abcdef".into(),
            serial_number: None,
            policy_oid: None,
        }
    }

    #[test]
    fn test_fresh_granted_token_is_valid() {
        let report = verify_token(&granted(NOW_SECS), NOW);
        assert!(report.valid, "{report:?}");
        assert_eq!(report.checks.len(), 5);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_two_year_old_token_fails_age_check() {
        let report = verify_token(&granted(NOW_SECS - 2 * MAX_AGE_SECS), NOW);
        assert!(!report.valid);
        assert!(!report.checks[CHECK_NOT_TOO_OLD]);
        assert!(report.checks[CHECK_NOT_FUTURE]);
    }

    #[test]
    fn test_ten_minutes_ahead_fails_future_check() {
        let report = verify_token(&granted(NOW_SECS + 600), NOW);
        assert!(!report.valid);
        assert!(!report.checks[CHECK_NOT_FUTURE]);
        assert!(report.checks[CHECK_NOT_TOO_OLD]);
    }

    #[test]
    fn test_skew_within_tolerance_passes() {
        assert!(verify_token(&granted(NOW_SECS + MAX_FUTURE_SKEW_SECS), NOW).valid);
    }

    #[test]
    fn test_bad_hash_fails_and_warns() {
        let mut token = granted(NOW_SECS);
        token.document_hash = "xyz".into();
        let report = verify_token(&token, NOW);
        assert!(!report.valid);
        assert!(!report.checks[CHECK_HASH_FORMAT]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_uppercase_hash_fails_format_check() {
        let mut token = granted(NOW_SECS);
        token.document_hash = "A".repeat(64);
        let report = verify_token(&token, NOW);
        assert!(!report.valid);
        assert!(!report.checks[CHECK_HASH_FORMAT]);
    }

    #[test]
    fn test_short_nonce_and_empty_token() {
        let mut token = granted(NOW_SECS);
        token.nonce = "abc".into();
        token.token = String::new();
        let report = verify_token(&token, NOW);
        assert!(!report.checks[CHECK_NONCE_PRESENT]);
        assert!(!report.checks[CHECK_TOKEN_PRESENT]);
        assert!(!report.valid);
    }

    #[test]
    fn test_fallback_warns_but_stays_valid() {
        let token = create_fallback(&"a".repeat(64), &"1".repeat(32), "FreeTSA", "down", NOW);
        let report = verify_token(&token, NOW);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("not certified"));
    }

    #[test]
    fn test_tampered_fallback_warns() {
        let mut token = create_fallback(&"a".repeat(64), &"1".repeat(32), "FreeTSA", "down", NOW);
        token.document_hash = "b".repeat(64);
        let report = verify_token(&token, NOW);
        assert!(report.valid);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("different document hash")));
    }

    #[test]
    fn test_non_der_granted_payload_warns() {
        let mut token = granted(NOW_SECS);
        token.token = BASE64.encode(b"<html>");
        let report = verify_token(&token, NOW);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }
}
