//! Configuration management
//!
//! Style options are an explicit record handed to the pipeline at
//! construction. There is no process-wide style state: two pipelines with
//! different configs can run side by side.

pub mod settings;

pub use settings::{Style, StyleConfig, StyleMetadata};
