//! # Blockness - Block-Driven Generative Art Attributes
//!
//! This is my attribute pipeline for generative art that is seeded entirely
//! by Ethereum blocks. When I come back to this code, here's what I need to
//! remember:
//!
//! ## What I Built
//! - **Block Analysis**: Arbitrary-precision parsing of every block and
//!   transaction quantity, plus highest/lowest/average statistics
//! - **Entropy Streams**: A rolling keccak hash walker, a per-transaction
//!   byte walker and an MT19937 twister seeded from the block hash
//! - **Style Mappers**: Space, Knots and Harbor policies that turn the
//!   statistics and entropy into attributes and renderer scenes
//! - **Trait Export**: Marketplace-style trait metadata records
//!
//! ## How I Organized My Code
//! - `core/`: Blocks, quantities, analysis, entropy, mappers and the pipeline
//! - `config/`: Style presets and TOML/environment configuration
//! - `utils/`: Keccak hashing, hex helpers and JSON serialization
//! - `cli/`: Command-line interface for the `blockness` binary
//!
//! ## Key Design Decisions I Made
//! - Every generation pass rebuilds everything from the block, so the same
//!   block and options always produce the same attributes
//! - OS randomness is only reachable through preview, and preview output
//!   refuses to export traits
//! - Malformed quantities fail the whole pass instead of defaulting to zero
//!
//! ## When I Need to Understand Something
//! 1. Start with `core/pipeline.rs` to see one full pass
//! 2. Look at `core/entropy.rs` for the stream schedules
//! 3. Check `core/mapper/` for how each style spends its draws

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Style, StyleConfig, StyleMetadata};
pub use core::{
    format_traits, parse_quantity, AttributeSet, Block, BlockAnalysis, Generation, Pipeline,
    Quantity, Scene, TraitMetadata, TraitRecord, TraitValue, Transaction,
};
pub use error::{ArtError, Result};
pub use utils::{keccak256_digest, keccak256_hex};
