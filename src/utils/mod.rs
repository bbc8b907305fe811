//! Utility functions and helpers
//!
//! This module contains the digest and hex helpers used by the entropy
//! walkers, plus the JSON serialization layer used by the CLI and tests.

pub mod crypto;
pub mod serialization;

pub use crypto::{decode_hex_digits, keccak256_digest, keccak256_hex};

pub use serialization::{deserialize, serialize_pretty};
