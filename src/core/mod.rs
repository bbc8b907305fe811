//! Core pipeline functionality
//!
//! This module contains the pieces of one generation pass: block input and
//! quantity parsing, transaction statistics, entropy streams, the per-style
//! attribute mappers and trait formatting.

pub mod analysis;
pub mod attributes;
pub mod block;
pub mod color;
pub mod entropy;
pub mod mapper;
pub mod pipeline;
pub mod quantity;
pub mod traits;

pub use analysis::{AnalysisSummary, BlockAnalysis, FieldStats, ParsedTransaction, TxStats};
pub use attributes::{AttributeSet, TraitValue};
pub use block::{Block, Transaction};
pub use color::Rgb;
pub use entropy::{
    open_stream, seed_from_hash, BlockStreams, ByteWalker, EntropySource, HashWalker,
    PreviewSource, PreviewStreams, StreamKind, StreamProvider, Twister, WalkSchedule,
};
pub use mapper::{mapper_for, Scene, StyleMapper, StyleOutput};
pub use pipeline::{Generation, Pipeline, RenderInput};
pub use quantity::{parse_quantity, Quantity};
pub use traits::{format_traits, title_case, trait_metadata, TraitMetadata, TraitRecord};
