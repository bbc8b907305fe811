//! The generation pipeline: block → analysis → streams → mapper → traits
//!
//! [`Pipeline::recompute`] is the one entry point for committed output. It
//! rebuilds everything from the block on every call; there is no cached
//! analysis and no stream state carried between calls, so the same block and
//! config always give the same result.

use crate::config::StyleConfig;
use crate::core::mapper::{mapper_for, Scene};
use crate::core::traits::{format_traits, TraitMetadata, TraitRecord};
use crate::core::{
    AttributeSet, Block, BlockAnalysis, BlockStreams, PreviewStreams, StreamProvider,
};
use crate::error::{ArtError, Result};
use log::{info, warn};
use serde::Serialize;

/// Output of one generation pass
#[derive(Debug, Clone)]
pub struct Generation {
    analysis: BlockAnalysis,
    attributes: AttributeSet,
    scene: Scene,
    deterministic: bool,
}

impl Generation {
    pub fn analysis(&self) -> &BlockAnalysis {
        &self.analysis
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// One signed offset triple per transaction, whatever the style
    pub fn offsets(&self) -> &[[f64; 3]] {
        self.scene.offsets()
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Export records for the attributes. Refused for preview output.
    pub fn traits(&self) -> Result<Vec<TraitRecord>> {
        if !self.deterministic {
            return Err(ArtError::PreviewExport);
        }
        Ok(format_traits(&self.attributes))
    }

    pub fn metadata(&self) -> Result<TraitMetadata> {
        Ok(TraitMetadata {
            attributes: self.traits()?,
        })
    }

    /// Renderer-facing view: attributes plus scene
    pub fn render_input(&self) -> RenderInput<'_> {
        RenderInput {
            block_number: self.analysis.number.to_string(),
            deterministic: self.deterministic,
            attributes: &self.attributes,
            scene: &self.scene,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderInput<'a> {
    pub block_number: String,
    pub deterministic: bool,
    pub attributes: &'a AttributeSet,
    pub scene: &'a Scene,
}

/// One configured pipeline. Holds only the config; every call builds a
/// fresh analysis and fresh streams.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: StyleConfig,
}

impl Pipeline {
    pub fn new(config: StyleConfig) -> Result<Pipeline> {
        config.validate()?;
        Ok(Pipeline { config })
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Deterministic generation for `block`. The preview flag in the config
    /// is ignored here.
    pub fn recompute(&self, block: &Block) -> Result<Generation> {
        self.run(block, &BlockStreams::new(block.get_hash()))
    }

    /// Generation for interactive preview. Draws from OS randomness when the
    /// config enables it; such output refuses to export traits.
    pub fn preview(&self, block: &Block) -> Result<Generation> {
        if self.config.preview_random {
            warn!("Generating non-deterministic preview for block {}", block.number);
            self.run(block, &PreviewStreams)
        } else {
            self.recompute(block)
        }
    }

    /// Independent passes over several blocks. Stops at the first failure;
    /// nothing is returned for a batch with a bad block.
    pub fn generate_batch(&self, blocks: &[Block]) -> Result<Vec<Generation>> {
        blocks.iter().map(|block| self.recompute(block)).collect()
    }

    fn run(&self, block: &Block, streams: &dyn StreamProvider) -> Result<Generation> {
        let analysis = BlockAnalysis::new(block)?;
        let mapper = mapper_for(self.config.style);
        let output = mapper.generate(&analysis, &self.config, streams)?;
        info!(
            "Generated {} attributes for block {} in the {} style",
            output.attributes.len(),
            analysis.number,
            self.config.style
        );
        Ok(Generation {
            analysis,
            attributes: output.attributes,
            scene: output.scene,
            deterministic: streams.is_deterministic(),
        })
    }
}
