use crate::config::{Style, StyleConfig};
use crate::core::mapper::{scatter_offsets, Scene, StyleMapper, StyleOutput};
use crate::core::{AttributeSet, BlockAnalysis, EntropySource, Rgb, StreamKind, StreamProvider};
use crate::error::Result;
use log::debug;
use num_bigint::BigInt;
use serde::Serialize;

const SUN_RADIUS: f64 = 15.0;
const MAX_SUNS: u32 = 2;
const SUN_SPREAD: u32 = 10;

/// Suns in space. Traits and then transaction offsets come from one seeded
/// stream; the suns replay a second, fresh stream from the same seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceMapper;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sun {
    pub color: String,
    pub position: [i64; 3],
    pub radius: f64,
    pub intensity: f64,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f64,
    pub phi_length: f64,
    pub theta_start: f64,
    pub theta_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceScene {
    pub ambient_color: String,
    pub point_light_color: String,
    pub background: String,
    pub suns: Vec<Sun>,
    pub offsets: Vec<[f64; 3]>,
}

impl SpaceMapper {
    /// "Vengeance" when `highest.nonce - average.gasPrice` is less than
    /// `average.gasPrice - lowest.gasPrice`, "Calm" otherwise. Signed
    /// big-integer arithmetic; either side may go negative.
    pub fn force(analysis: &BlockAnalysis) -> &'static str {
        let stats = &analysis.tx_stats;
        let highest_nonce = BigInt::from(stats.highest.nonce.clone());
        let average_price = BigInt::from(stats.average.gas_price.clone());
        let lowest_price = BigInt::from(stats.lowest.gas_price.clone());

        if highest_nonce - &average_price < average_price - lowest_price {
            "Vengeance"
        } else {
            "Calm"
        }
    }

    /// Red from the first base color, green from the second, blue from the third
    pub fn glow(config: &StyleConfig) -> Result<Rgb> {
        Ok(Rgb::new(
            config.color(0)?.r,
            config.color(1)?.g,
            config.color(2)?.b,
        ))
    }

    fn attributes(
        analysis: &BlockAnalysis,
        config: &StyleConfig,
        entropy: &mut dyn EntropySource,
    ) -> Result<AttributeSet> {
        let charm = config.modifier(0) / 10.0;
        let luck = config.modifier(2) * 12.0;
        let deepness = (entropy.draw_unit()? / 100.0) * 100.0;
        let magic = (config.modifier(1) + 0.001) * entropy.draw_unit()? * 500.0;

        Ok(AttributeSet::new()
            .with("magic", magic)
            .with("charm", charm)
            .with("luck", luck)
            .with("deepness", deepness)
            .with("force", Self::force(analysis))
            .with("glow", Self::glow(config)?.to_hex()))
    }

    fn scene(
        config: &StyleConfig,
        glow: &str,
        offsets: Vec<[f64; 3]>,
        entropy: &mut dyn EntropySource,
    ) -> Result<SpaceScene> {
        let num_suns = entropy.random_int(MAX_SUNS)? + 1;
        let n = i64::from(num_suns);

        let mut suns = Vec::with_capacity(num_suns as usize);
        for index in 0..num_suns as usize {
            let x = n * i64::from(entropy.random_int(SUN_SPREAD)?);
            let y = -(n * i64::from(entropy.random_int(SUN_SPREAD)?));
            let z = n * i64::from(entropy.random_int(SUN_SPREAD)?);
            suns.push(Sun {
                color: config
                    .color_text(index)
                    .unwrap_or_else(|| config.background.clone()),
                position: [x, y, z],
                radius: SUN_RADIUS,
                intensity: 1.0 / n as f64,
                width_segments: 3,
                height_segments: 16,
                phi_start: 1.0,
                phi_length: 6.3,
                theta_start: 3.0,
                theta_length: 6.3,
            });
        }
        debug!("Placed {num_suns} suns");

        Ok(SpaceScene {
            ambient_color: config.color_text(0).unwrap_or_default(),
            point_light_color: glow.to_string(),
            background: config.background.clone(),
            suns,
            offsets,
        })
    }
}

impl StyleMapper for SpaceMapper {
    fn style(&self) -> Style {
        Style::Space
    }

    fn generate(
        &self,
        analysis: &BlockAnalysis,
        config: &StyleConfig,
        streams: &dyn StreamProvider,
    ) -> Result<StyleOutput> {
        let mut entropy = streams.block_stream(StreamKind::Twister)?;
        let attributes = Self::attributes(analysis, config, entropy.as_mut())?;
        let offsets = scatter_offsets(analysis.tx_count(), entropy.as_mut())?;

        let glow = Self::glow(config)?.to_hex();
        let mut scene_entropy = streams.block_stream(StreamKind::Twister)?;
        let scene = Self::scene(config, &glow, offsets, scene_entropy.as_mut())?;

        Ok(StyleOutput {
            attributes,
            scene: Scene::Space(scene),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::SCATTER;
    use crate::core::{BlockStreams, Twister, TraitValue};
    use crate::fixtures;

    fn run(block: &crate::core::Block, config: &StyleConfig) -> StyleOutput {
        let analysis = BlockAnalysis::new(block).unwrap();
        SpaceMapper
            .generate(&analysis, config, &BlockStreams::new(block.get_hash()))
            .unwrap()
    }

    #[test]
    fn test_trait_schema_and_order() {
        let output = run(&fixtures::ethers_block(), &StyleConfig::preset(Style::Space));
        let keys: Vec<&str> = output.attributes.keys().collect();
        assert_eq!(keys, vec!["magic", "charm", "luck", "deepness", "force", "glow"]);
    }

    #[test]
    fn test_modifier_traits() {
        let output = run(&fixtures::ethers_block(), &StyleConfig::preset(Style::Space));
        let charm = output.attributes.get("charm").and_then(TraitValue::as_number).unwrap();
        let luck = output.attributes.get("luck").and_then(TraitValue::as_number).unwrap();
        assert!((charm - 0.065).abs() < 1e-12);
        assert!((luck - 4.8).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_traits_follow_twister() {
        let block = fixtures::ethers_block();
        let output = run(&block, &StyleConfig::preset(Style::Space));

        let mut twister = Twister::from_block_hash(block.get_hash()).unwrap();
        let deepness = (twister.random() / 100.0) * 100.0;
        let magic = (0.1 + 0.001) * twister.random() * 500.0;

        assert_eq!(output.attributes.get("deepness"), Some(&TraitValue::Number(deepness)));
        assert_eq!(output.attributes.get("magic"), Some(&TraitValue::Number(magic)));
    }

    #[test]
    fn test_glow_samples_one_channel_per_color() {
        let output = run(&fixtures::ethers_block(), &StyleConfig::preset(Style::Space));
        // #f7f022, #aa0909, #45cc66 -> f7, 09, 66
        assert_eq!(output.attributes.get("glow"), Some(&TraitValue::from("#F70966")));
    }

    #[test]
    fn test_force_vengeance_and_calm() {
        // nonces 0..2 -> highest nonce 2; gas prices [10, 40, 100]: average 50, lowest 10
        // 2 - 50 = -48 < 50 - 10 = 40
        let block = fixtures::block_with_gas_prices(&[10, 40, 100]);
        let analysis = BlockAnalysis::new(&block).unwrap();
        assert_eq!(SpaceMapper::force(&analysis), "Vengeance");

        // the ethers fixture: highest nonce 42 - average 65 gwei is far below
        // 65 gwei - 50 gwei
        let analysis = BlockAnalysis::new(&fixtures::ethers_block()).unwrap();
        assert_eq!(SpaceMapper::force(&analysis), "Vengeance");

        // one zero-priced transaction with nonce 0: 0 - 0 < 0 - 0 is false
        let block = fixtures::block_with_gas_prices(&[0]);
        let analysis = BlockAnalysis::new(&block).unwrap();
        assert_eq!(SpaceMapper::force(&analysis), "Calm");
    }

    #[test]
    fn test_empty_block_defaults() {
        let output = run(&fixtures::empty_block(), &StyleConfig::preset(Style::Space));
        assert_eq!(output.attributes.len(), 6);
        assert_eq!(output.attributes.get("force"), Some(&TraitValue::from("Calm")));
    }

    #[test]
    fn test_scene_suns() {
        let block = fixtures::ethers_block();
        let output = run(&block, &StyleConfig::preset(Style::Space));
        let Scene::Space(scene) = output.scene else {
            panic!("expected a space scene");
        };

        let mut twister = Twister::from_block_hash(block.get_hash()).unwrap();
        let expected_suns = (twister.random() * 2.0).floor() as usize + 1;
        assert_eq!(scene.suns.len(), expected_suns);
        assert_eq!(scene.suns[0].color, "#f7f022");
        assert_eq!(scene.point_light_color, "#F70966");

        let n = expected_suns as i64;
        for sun in &scene.suns {
            assert!(sun.position[0] >= 0 && sun.position[0] < 10 * n);
            assert!(sun.position[1] <= 0 && sun.position[1] > -10 * n);
            assert_eq!(sun.position[0] % n, 0);
            assert_eq!(sun.intensity, 1.0 / n as f64);
        }
    }

    #[test]
    fn test_offsets_follow_the_trait_draws() {
        let block = fixtures::block_with_gas_prices(&[1, 2, 3, 4]);
        let output = run(&block, &StyleConfig::preset(Style::Space));
        let Scene::Space(scene) = output.scene else {
            panic!("expected a space scene");
        };

        // deepness and magic come first, then three draws per transaction
        let mut twister = Twister::from_block_hash(block.get_hash()).unwrap();
        twister.random();
        twister.random();
        let draws: Vec<f64> = (0..12).map(|_| twister.random() * SCATTER).collect();

        let signs = [
            [1.0, 1.0, 1.0],
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
        ];
        assert_eq!(scene.offsets.len(), 4);
        for (index, offset) in scene.offsets.iter().enumerate() {
            for axis in 0..3 {
                assert_eq!(offset[axis], draws[index * 3 + axis] * signs[index][axis]);
            }
        }
    }

    #[test]
    fn test_empty_block_has_no_offsets() {
        let output = run(&fixtures::empty_block(), &StyleConfig::preset(Style::Space));
        assert!(output.scene.offsets().is_empty());
    }
}
