//! # Timestamp Request Codec
//!
//! Encodes an RFC 3161 `TimeStampReq` and takes a cheap look at the reply.
//!
//! ```text
//! TimeStampReq ::= SEQUENCE {
//!    version         INTEGER { v1(1) },
//!    messageImprint  SEQUENCE { AlgorithmIdentifier, OCTET STRING },
//!    reqPolicy       OBJECT IDENTIFIER OPTIONAL,
//!    nonce           INTEGER OPTIONAL,
//!    certReq         BOOLEAN DEFAULT FALSE }
//! ```
//!
//! The reply is stored opaquely. Its signature and certificate chain are not
//! verified here; trust comes from the authority being a configured one.

use chrono::{NaiveDateTime, TimeZone, Utc};
use shared_crypto::{decode_hex_digest, random_hex};

use super::der::{self, DerLengthForm};
use super::entities::{PkiStatus, ReplyHints, ResponseStatus};
use super::errors::TimestampError;

/// SHA-256 algorithm identifier.
pub const SHA256_OID: &str = "2.16.840.1.101.3.4.2.1";

/// Nonce size in bytes (32 hex characters).
pub const NONCE_BYTES: usize = 16;

/// Shortest reply worth treating as a timestamp response.
pub const MIN_RESPONSE_LEN: usize = 10;

/// Fresh 16-byte nonce as 32 lowercase hex characters.
pub fn generate_nonce() -> String {
    random_hex(NONCE_BYTES)
}

/// Encode a request with the default wire format and no policy.
pub fn build_request(document_hash_hex: &str, nonce_hex: &str) -> Result<Vec<u8>, TimestampError> {
    build_request_with(document_hash_hex, nonce_hex, None, DerLengthForm::default())
}

/// Encode a request.
///
/// `length_form` applies to the outer container only; nested elements are
/// always minimal.
///
/// # Errors
/// * `InvalidHash` - hash is not 64 hex characters
/// * `InvalidNonce` - nonce is not 32 hex characters
/// * `Encoding` - policy is not a dotted-decimal OID
pub fn build_request_with(
    document_hash_hex: &str,
    nonce_hex: &str,
    policy_oid: Option<&str>,
    length_form: DerLengthForm,
) -> Result<Vec<u8>, TimestampError> {
    let hash = decode_hex_digest(document_hash_hex)
        .map_err(|e| TimestampError::InvalidHash(e.to_string()))?;
    let nonce = decode_nonce(nonce_hex)?;

    let algorithm_oid =
        der::oid(SHA256_OID).ok_or_else(|| TimestampError::Encoding(SHA256_OID.into()))?;
    let algorithm = der::sequence(&[&algorithm_oid, &der::null()]);
    let imprint = der::sequence(&[&algorithm, &der::octet_string(&hash)]);

    let version = der::unsigned_integer(&[1]);
    let policy = policy_oid
        .map(|dotted| {
            der::oid(dotted).ok_or_else(|| TimestampError::Encoding(format!("policy OID {dotted}")))
        })
        .transpose()?
        .unwrap_or_default();
    let nonce = der::unsigned_integer(&nonce);
    let cert_req = der::boolean(true);

    Ok(der::sequence_with(
        &[&version, &imprint, &policy, &nonce, &cert_req],
        length_form,
    ))
}

fn decode_nonce(nonce_hex: &str) -> Result<Vec<u8>, TimestampError> {
    if nonce_hex.len() != NONCE_BYTES * 2 {
        return Err(TimestampError::InvalidNonce(format!(
            "expected {} hex characters, got {}",
            NONCE_BYTES * 2,
            nonce_hex.len()
        )));
    }
    hex::decode(nonce_hex).map_err(|e| TimestampError::InvalidNonce(e.to_string()))
}

/// Structural sanity check of a reply.
///
/// The reply must start with a SEQUENCE tag and be at least
/// [`MIN_RESPONSE_LEN`] bytes. When the leading `PKIStatusInfo` parses, its
/// status is returned too.
pub fn decode_response_status(bytes: &[u8]) -> ResponseStatus {
    ResponseStatus {
        structurally_valid: bytes.first() == Some(&der::TAG_SEQUENCE)
            && bytes.len() >= MIN_RESPONSE_LEN,
        pki_status: read_pki_status(bytes),
    }
}

fn read_pki_status(bytes: &[u8]) -> Option<PkiStatus> {
    let response = der::content_of(bytes, der::TAG_SEQUENCE)?;
    let status_info = der::content_of(response, der::TAG_SEQUENCE)?;
    let status = der::content_of(status_info, der::TAG_INTEGER)?;
    if status.is_empty() || status.len() > 8 {
        return None;
    }
    let code = status
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    PkiStatus::from_code(code)
}

/// Pull `genTime`, `serialNumber` and `policy` out of a granted reply
/// without parsing the CMS structure.
///
/// - `genTime`: first well-formed GeneralizedTime
/// - `serialNumber`: the INTEGER following our message imprint
/// - `policy`: the OID following a `version INTEGER 1` and preceding a SEQUENCE
pub fn inspect_reply(bytes: &[u8], document_hash_hex: &str) -> ReplyHints {
    ReplyHints {
        gen_time: find_generalized_time(bytes),
        serial_number: decode_hex_digest(document_hash_hex)
            .ok()
            .and_then(|hash| find_serial_after_imprint(bytes, &hash)),
        policy_oid: find_tst_policy(bytes),
    }
}

fn find_generalized_time(bytes: &[u8]) -> Option<chrono::DateTime<Utc>> {
    (0..bytes.len()).find_map(|i| {
        let slice = &bytes[i..];
        if slice.first() != Some(&der::TAG_GENERALIZED_TIME) {
            return None;
        }
        let content = der::content_of(slice, der::TAG_GENERALIZED_TIME)?;
        if content.len() < 15 || content.last() != Some(&b'Z') {
            return None;
        }
        let text = std::str::from_utf8(content).ok()?;
        let naive = NaiveDateTime::parse_from_str(text.get(..14)?, "%Y%m%d%H%M%S").ok()?;
        Some(Utc.from_utc_datetime(&naive))
    })
}

fn find_serial_after_imprint(bytes: &[u8], hash: &[u8; 32]) -> Option<String> {
    let mut needle = vec![der::TAG_OCTET_STRING, 0x20];
    needle.extend_from_slice(hash);
    let start = bytes
        .windows(needle.len())
        .position(|window| window == needle.as_slice())?;
    let serial = der::content_of(&bytes[start + needle.len()..], der::TAG_INTEGER)?;
    (!serial.is_empty()).then(|| hex::encode(serial))
}

fn find_tst_policy(bytes: &[u8]) -> Option<String> {
    const VERSION_THEN_OID: [u8; 4] = [der::TAG_INTEGER, 0x01, 0x01, der::TAG_OID];
    bytes
        .windows(VERSION_THEN_OID.len())
        .enumerate()
        .filter(|(_, window)| *window == VERSION_THEN_OID)
        .find_map(|(i, _)| {
            let at_oid = &bytes[i + 3..];
            let header = der::read_header(at_oid)?;
            let after = at_oid.get(header.total_len())?;
            if *after != der::TAG_SEQUENCE {
                return None;
            }
            der::decode_oid_content(&at_oid[header.header_len..header.total_len()])
        })
}
