use data_encoding::HEXLOWER;
use sha3::{Digest, Keccak256};

use crate::error::{ArtError, Result};

pub fn keccak256_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Keccak-256 of `data`, as 64 lowercase hex characters without a prefix
pub fn keccak256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(&keccak256_digest(data))
}

/// Decode a hex string into bytes. An optional `0x` prefix is stripped and an
/// odd number of digits is left-padded with a zero nibble.
pub fn decode_hex_digits(value: &str) -> Result<Vec<u8>> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    hex::decode(padded).map_err(|e| ArtError::Parse(format!("Invalid hex string {value:?}: {e}")))
}
