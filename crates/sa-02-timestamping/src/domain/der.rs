//! # DER Tag-Length-Value Primitives
//!
//! Just enough ASN.1 DER to build a timestamp request and to peek at the
//! first few fields of a reply. Not a general-purpose parser.

use serde::{Deserialize, Serialize};

pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_GENERALIZED_TIME: u8 = 0x18;
pub const TAG_SEQUENCE: u8 = 0x30;

/// How a container's length field is written.
///
/// `FixedLong` always uses the two-byte long form (`0x82 HI LO`) for lengths
/// up to 65535, which is what deployed authorities have been receiving from
/// this system. It is not canonical DER for short contents; `Minimal` is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerLengthForm {
    #[default]
    FixedLong,
    Minimal,
}

/// Encode a length field.
pub fn encode_length(len: usize, form: DerLengthForm) -> Vec<u8> {
    match form {
        DerLengthForm::FixedLong if len <= 0xFFFF => vec![0x82, (len >> 8) as u8, len as u8],
        _ if len < 0x80 => vec![len as u8],
        _ => {
            let bytes = len.to_be_bytes();
            let skip = bytes.iter().take_while(|b| **b == 0).count();
            let mut out = vec![0x80 | (bytes.len() - skip) as u8];
            out.extend_from_slice(&bytes[skip..]);
            out
        }
    }
}

/// Wrap `content` in a TLV with a minimal length.
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    tlv_with(tag, content, DerLengthForm::Minimal)
}

/// Wrap `content` in a TLV with the given length form.
pub fn tlv_with(tag: u8, content: &[u8], form: DerLengthForm) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 4);
    out.push(tag);
    out.extend(encode_length(content.len(), form));
    out.extend_from_slice(content);
    out
}

/// SEQUENCE over already-encoded elements.
pub fn sequence(elements: &[&[u8]]) -> Vec<u8> {
    sequence_with(elements, DerLengthForm::Minimal)
}

/// SEQUENCE over already-encoded elements with the given length form.
pub fn sequence_with(elements: &[&[u8]], form: DerLengthForm) -> Vec<u8> {
    tlv_with(TAG_SEQUENCE, &elements.concat(), form)
}

/// INTEGER from a big-endian unsigned magnitude.
///
/// Leading zero bytes are dropped and a `0x00` is prepended when the high
/// bit is set, so the value is never read back as negative.
pub fn unsigned_integer(magnitude: &[u8]) -> Vec<u8> {
    let skip = magnitude.iter().take_while(|b| **b == 0).count();
    let trimmed = &magnitude[skip..];
    let mut content = Vec::with_capacity(trimmed.len() + 1);
    match trimmed.first() {
        None => content.push(0),
        Some(first) if first & 0x80 != 0 => {
            content.push(0);
            content.extend_from_slice(trimmed);
        }
        Some(_) => content.extend_from_slice(trimmed),
    }
    tlv(TAG_INTEGER, &content)
}

/// BOOLEAN.
pub fn boolean(value: bool) -> Vec<u8> {
    tlv(TAG_BOOLEAN, &[if value { 0xFF } else { 0x00 }])
}

/// NULL.
pub fn null() -> Vec<u8> {
    vec![TAG_NULL, 0x00]
}

/// OCTET STRING.
pub fn octet_string(content: &[u8]) -> Vec<u8> {
    tlv(TAG_OCTET_STRING, content)
}

/// Encode dotted-decimal OID content (without tag and length).
///
/// Returns `None` unless there are at least two numeric arcs with a first
/// arc of 0, 1 or 2.
pub fn encode_oid_content(dotted: &str) -> Option<Vec<u8>> {
    let arcs = dotted
        .split('.')
        .map(|arc| arc.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;
    let (first, second) = (*arcs.first()?, *arcs.get(1)?);
    if first > 2 || (first < 2 && second >= 40) {
        return None;
    }
    let mut out = Vec::new();
    push_base128(&mut out, first.checked_mul(40)?.checked_add(second)?);
    for arc in &arcs[2..] {
        push_base128(&mut out, *arc);
    }
    Some(out)
}

/// OBJECT IDENTIFIER TLV.
pub fn oid(dotted: &str) -> Option<Vec<u8>> {
    encode_oid_content(dotted).map(|content| tlv(TAG_OID, &content))
}

fn push_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push(0x80 | (value & 0x7F) as u8);
        value >>= 7;
    }
    groups.reverse();
    out.extend(groups);
}

/// Decode OID content bytes into dotted-decimal form.
pub fn decode_oid_content(content: &[u8]) -> Option<String> {
    let mut arcs: Vec<u64> = Vec::new();
    let mut value: u64 = 0;
    for (i, byte) in content.iter().enumerate() {
        value = value.checked_mul(128)? | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            if arcs.is_empty() {
                let first = (value / 40).min(2);
                arcs.push(first);
                arcs.push(value - first * 40);
            } else {
                arcs.push(value);
            }
            value = 0;
        } else if i == content.len() - 1 {
            return None;
        }
    }
    if arcs.is_empty() {
        return None;
    }
    Some(
        arcs.iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// A parsed TLV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: u8,
    /// Bytes taken by tag and length.
    pub header_len: usize,
    pub content_len: usize,
}

impl Header {
    /// Offset just past this element.
    pub fn total_len(&self) -> usize {
        self.header_len + self.content_len
    }
}

/// Read the TLV header at the start of `bytes`.
///
/// Only definite lengths of up to four bytes are accepted, and the
/// declared content must fit inside `bytes`.
pub fn read_header(bytes: &[u8]) -> Option<Header> {
    let tag = *bytes.first()?;
    let first = *bytes.get(1)?;
    let (header_len, content_len) = if first < 0x80 {
        (2, usize::from(first))
    } else {
        let n = usize::from(first & 0x7F);
        if n == 0 || n > 4 {
            return None;
        }
        let len = bytes
            .get(2..2 + n)?
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
        (2 + n, len)
    };
    let header = Header {
        tag,
        header_len,
        content_len,
    };
    (header.total_len() <= bytes.len()).then_some(header)
}

/// Content bytes of the element starting at `bytes`, if its tag is `tag`.
pub fn content_of(bytes: &[u8], tag: u8) -> Option<&[u8]> {
    let header = read_header(bytes)?;
    (header.tag == tag).then(|| &bytes[header.header_len..header.total_len()])
}
