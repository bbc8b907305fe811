use crate::config::{Style, StyleConfig};
use crate::core::mapper::{scatter_offsets, Scene, StyleMapper, StyleOutput};
use crate::core::{AttributeSet, BlockAnalysis, EntropySource, Rgb, StreamKind, StreamProvider};
use crate::error::Result;
use serde::Serialize;

/// Torus knots scattered around the origin, one per transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct KnotsMapper;

/// Shape arguments shared by every knot in the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorusKnotParams {
    pub radius: f64,
    pub tube: f64,
    pub tubular_segments: f64,
    pub radial_segments: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnotScene {
    pub ambient_color: String,
    pub background: String,
    pub rotation_y: f64,
    pub knot: TorusKnotParams,
    /// One position per transaction, in transaction order
    pub offsets: Vec<[f64; 3]>,
}

impl KnotsMapper {
    fn channel(entropy: &mut dyn EntropySource) -> Result<u8> {
        Ok((255.0 * entropy.draw_unit()?).floor() as u8)
    }
}

impl StyleMapper for KnotsMapper {
    fn style(&self) -> Style {
        Style::Knots
    }

    fn generate(
        &self,
        analysis: &BlockAnalysis,
        config: &StyleConfig,
        streams: &dyn StreamProvider,
    ) -> Result<StyleOutput> {
        let mut entropy = streams.block_stream(StreamKind::Twister)?;
        let entropy = entropy.as_mut();

        let color = Rgb::new(
            Self::channel(entropy)?,
            Self::channel(entropy)?,
            Self::channel(entropy)?,
        );
        let scale = entropy.draw_unit()? / 100.0;
        let offsets = scatter_offsets(analysis.tx_count(), entropy)?;

        let (mod1, mod2, mod3) = (config.modifier(0), config.modifier(1), config.modifier(2));
        let scene = KnotScene {
            ambient_color: color.to_hex(),
            background: config.background.clone(),
            rotation_y: mod2,
            knot: TorusKnotParams {
                radius: scale * 100.0,
                tube: mod1 / 10.0,
                tubular_segments: (mod2 + 0.001) * 500.0,
                radial_segments: mod3 * 12.0,
            },
            offsets,
        };

        // This style publishes a fixed trait set
        let attributes = AttributeSet::new()
            .with("magic", 10.0)
            .with("charm", 5.0)
            .with("luck", 3.0)
            .with("deepness", "Abiding")
            .with("calm", "Approaching")
            .with("vengeance", "Ultimate");

        Ok(StyleOutput {
            attributes,
            scene: Scene::Knots(scene),
        })
    }
}
