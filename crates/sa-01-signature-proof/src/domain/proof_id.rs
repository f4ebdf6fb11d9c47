//! Proof identifiers: `SIG-<base36 millis>-<8 random base36>`, upper-cased.

use shared_crypto::{random_base36, to_base36};

/// Prefix of every proof identifier.
pub const PROOF_ID_PREFIX: &str = "SIG";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 8;

/// Generate a new proof identifier for the given creation instant.
pub fn generate_proof_id(now_millis: i64) -> String {
    let millis = u64::try_from(now_millis).unwrap_or(0);
    format!(
        "{}-{}-{}",
        PROOF_ID_PREFIX,
        to_base36(millis),
        random_base36(SUFFIX_LEN)
    )
    .to_uppercase()
}

/// True when `id` has the `SIG-[0-9A-Z]+-[0-9A-Z]{8}` shape.
pub fn is_valid_proof_id(id: &str) -> bool {
    let is_upper_alnum = |c: char| c.is_ascii_digit() || c.is_ascii_uppercase();
    let mut parts = id.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(PROOF_ID_PREFIX), Some(time), Some(suffix), None) => {
            !time.is_empty()
                && time.chars().all(is_upper_alnum)
                && suffix.len() == SUFFIX_LEN
                && suffix.chars().all(is_upper_alnum)
        }
        _ => false,
    }
}
