//! Arbitrary-precision parsing of block and transaction quantities
//!
//! Block data arrives with numbers in several shapes: `0x`-prefixed hex
//! strings, bare hex strings, decimal strings, JSON integers, or
//! ethers-style `{ "hex": "0x..", "type": "BigNumber" }` objects. Everything
//! is normalized into [`BigUint`] before any arithmetic happens, so gas and
//! value figures above 2^53 never pass through floating point.

use crate::error::{ArtError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse a hex (optionally `0x`-prefixed) or decimal numeral.
///
/// - `0x`/`0X` prefix: hexadecimal digits follow; a bare `0x` is zero.
/// - no prefix, only ASCII digits: decimal.
/// - no prefix, anything else: hexadecimal, so `"ff"` is 255.
pub fn parse_quantity(input: &str) -> Result<BigUint> {
    if input.is_empty() {
        return Err(ArtError::Parse("Empty numeric field".to_string()));
    }

    if let Some(digits) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        if digits.is_empty() {
            return Ok(BigUint::from(0u8));
        }
        return parse_radix(input, digits, 16);
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        parse_radix(input, input, 10)
    } else {
        parse_radix(input, input, 16)
    }
}

fn parse_radix(text: &str, digits: &str, radix: u32) -> Result<BigUint> {
    // parse_bytes tolerates '_' separators; block data never contains them
    if !digits.bytes().all(|b| (b as char).is_digit(radix)) {
        return Err(ArtError::Parse(format!(
            "Invalid base-{radix} numeral: {text:?}"
        )));
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| ArtError::Parse(format!("Invalid base-{radix} numeral: {text:?}")))
}

/// A raw quantity as it appears in block JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// ethers.js `BigNumber` serialization
    Wrapped {
        hex: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
    Text(String),
    Integer(u64),
}

impl Quantity {
    pub fn parse(&self) -> Result<BigUint> {
        match self {
            Quantity::Wrapped { hex, .. } => parse_quantity(hex),
            Quantity::Text(text) => parse_quantity(text),
            Quantity::Integer(value) => Ok(BigUint::from(*value)),
        }
    }

    /// The raw textual form, used where entropy is keyed on the field itself
    pub fn raw_text(&self) -> String {
        match self {
            Quantity::Wrapped { hex, .. } => hex.clone(),
            Quantity::Text(text) => text.clone(),
            Quantity::Integer(value) => format!("{value:#x}"),
        }
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Quantity::Integer(value)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Integer(0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw_text())
    }
}
