//! # Secure Randomness
//!
//! Nonces and identifier suffixes are drawn from `OsRng`, which reads the
//! operating system CSPRNG and may be used from any thread without locking.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fill `len` bytes from the OS CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// `len` random bytes rendered as lowercase hex (`2 * len` characters).
pub fn random_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// `len` random lowercase base36 characters.
pub fn random_base36(len: usize) -> String {
    (0..len)
        .map(|_| BASE36_DIGITS[OsRng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect()
}

/// Render `value` in lowercase base36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII digits were pushed.
    digits.into_iter().map(char::from).collect()
}
