//! Attribute mappers: one policy per visual style
//!
//! A mapper turns a [`BlockAnalysis`], the style options and the block's
//! entropy streams into an [`AttributeSet`] plus the scene parameters the
//! renderer consumes. Mappers hold no state; every call replays its streams
//! from the start.
//!
//! Every scene carries one offset triple per transaction, drawn from the
//! style's block stream once that style's own draws are done.

pub mod harbor;
pub mod knots;
pub mod space;

pub use harbor::{HarborMapper, HarborScene};
pub use knots::{KnotScene, KnotsMapper, TorusKnotParams};
pub use space::{SpaceMapper, SpaceScene, Sun};

use crate::config::{Style, StyleConfig};
use crate::core::{AttributeSet, BlockAnalysis, EntropySource, StreamProvider};
use crate::error::Result;
use serde::Serialize;

/// Renderer input for one generation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum Scene {
    Space(SpaceScene),
    Knots(KnotScene),
    Harbor(HarborScene),
}

impl Scene {
    /// Per-transaction offsets, in transaction order
    pub fn offsets(&self) -> &[[f64; 3]] {
        match self {
            Scene::Space(scene) => &scene.offsets,
            Scene::Knots(scene) => &scene.offsets,
            Scene::Harbor(scene) => &scene.offsets,
        }
    }
}

/// What a mapper produces
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOutput {
    pub attributes: AttributeSet,
    pub scene: Scene,
}

pub trait StyleMapper {
    fn style(&self) -> Style;

    fn generate(
        &self,
        analysis: &BlockAnalysis,
        config: &StyleConfig,
        streams: &dyn StreamProvider,
    ) -> Result<StyleOutput>;
}

/// The mapper for a style
pub fn mapper_for(style: Style) -> Box<dyn StyleMapper> {
    match style {
        Style::Space => Box::new(SpaceMapper),
        Style::Knots => Box::new(KnotsMapper),
        Style::Harbor => Box::new(HarborMapper),
    }
}

/// Sign of each offset axis for a transaction index: the axes flip to
/// negative whenever `index % 2`, `index % 3` and `index % 4` respectively
/// are non-zero.
pub fn parity_signs(index: usize) -> [f64; 3] {
    let flip = |modulus: usize| if index % modulus != 0 { -1.0 } else { 1.0 };
    [flip(2), flip(3), flip(4)]
}

/// Per-transaction scatter: three draws per transaction, each scaled by
/// [`SCATTER`] and signed by [`parity_signs`]
pub fn scatter_offsets(
    tx_count: usize,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<[f64; 3]>> {
    let mut offsets = Vec::with_capacity(tx_count);
    for index in 0..tx_count {
        let [sx, sy, sz] = parity_signs(index);
        let x = entropy.draw_unit()? * SCATTER * sx;
        let y = entropy.draw_unit()? * SCATTER * sy;
        let z = entropy.draw_unit()? * SCATTER * sz;
        offsets.push([x, y, z]);
    }
    Ok(offsets)
}

/// Largest offset magnitude on any axis
pub const SCATTER: f64 = 1.5;
