//! # Domain Entities
//!
//! Results returned by the client, the verifier and the reply decoder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::TimestampToken;
use std::collections::BTreeMap;

/// Outcome of a timestamp request.
///
/// `success` is always true: an unreachable authority yields a fallback
/// token with `fallback_used` set and the cause in `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampResult {
    pub success: bool,
    pub token: TimestampToken,
    pub fallback_used: bool,
    pub error: Option<String>,
}

impl TimestampResult {
    /// A token issued by an authority.
    pub fn granted(token: TimestampToken) -> Self {
        Self {
            success: true,
            token,
            fallback_used: false,
            error: None,
        }
    }

    /// A local fallback token, with the reason the authority path failed.
    pub fn fallback(token: TimestampToken, error: impl Into<String>) -> Self {
        Self {
            success: true,
            token,
            fallback_used: true,
            error: Some(error.into()),
        }
    }
}

/// Result of the structural token checks.
///
/// `valid` is the conjunction of `checks`; `warnings` never affect it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    pub checks: BTreeMap<String, bool>,
    pub warnings: Vec<String>,
}

/// `PKIStatus` values from a timestamp reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PkiStatus {
    Granted,
    GrantedWithMods,
    Rejection,
    Waiting,
    RevocationWarning,
    RevocationNotification,
}

impl PkiStatus {
    /// Map the wire integer.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Granted),
            1 => Some(Self::GrantedWithMods),
            2 => Some(Self::Rejection),
            3 => Some(Self::Waiting),
            4 => Some(Self::RevocationWarning),
            5 => Some(Self::RevocationNotification),
            _ => None,
        }
    }

    /// Whether a token was issued.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted | Self::GrantedWithMods)
    }
}

/// Cheap structural verdict on a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseStatus {
    /// Starts with a SEQUENCE tag and is long enough to hold a token.
    pub structurally_valid: bool,
    /// `PKIStatusInfo.status`, when the leading fields parse.
    pub pki_status: Option<PkiStatus>,
}

/// Fields read from a granted reply on a best-effort basis.
///
/// None of these are trusted; they only annotate the stored token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyHints {
    pub gen_time: Option<DateTime<Utc>>,
    pub serial_number: Option<String>,
    pub policy_oid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pki_status_codes() {
        assert_eq!(PkiStatus::from_code(0), Some(PkiStatus::Granted));
        assert_eq!(PkiStatus::from_code(3), Some(PkiStatus::Waiting));
        assert_eq!(PkiStatus::from_code(6), None);
        assert!(PkiStatus::GrantedWithMods.is_granted());
        assert!(!PkiStatus::Rejection.is_granted());
        assert!(!PkiStatus::Waiting.is_granted());
        assert!(!PkiStatus::RevocationWarning.is_granted());
    }
}
