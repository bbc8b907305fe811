//! Harbor seascape: a 1280×1280 scene with clouds, a strip of coast tiles,
//! fish below the waterline and one ship per transaction.
//!
//! Three kinds of stream feed it: the rolling walker over the block hash
//! (clouds, coast, ocean covers, transaction offsets), a walker over `keccak256(gasUsed)` (fish)
//! and a byte walker over each transaction hash (ships).

use crate::config::{Style, StyleConfig};
use crate::core::mapper::{scatter_offsets, Scene, StyleMapper, StyleOutput};
use crate::core::{AttributeSet, BlockAnalysis, EntropySource, StreamKind, StreamProvider};
use crate::error::Result;
use log::{debug, warn};
use num_bigint::BigUint;
use serde::Serialize;

pub const SIZE: f64 = 1280.0;
const HORIZON: f64 = SIZE / 2.0;
const LAND_HORIZON: f64 = HORIZON - 64.0;
const TILE_COUNT: usize = 16;
const TILE_WIDTH: f64 = 87.0;
const TILE_HEIGHT: f64 = 125.0;
const DOGGER_WIDTH: f64 = 75.0;
const DOGGER_KINDS: u8 = 6;
const SHIP_DEPTH: f64 = SIZE / 4.0;
const FISH_DENSITY: u32 = 42;
const MAX_GAS: u32 = 15_000_000;
const MAX_FISH: usize = 1024;

const CLOUD_SIZES: [(f64, f64); 7] = [
    (400.0, 152.0),
    (600.0, 228.0),
    (901.0, 250.0),
    (810.0, 280.0),
    (810.0, 280.0),
    (810.0, 280.0),
    (810.0, 280.0),
];

pub const FOREST: u8 = 1;
pub const GRASS: u8 = 2;
pub const RIVER: u8 = 5;
pub const SETTLERS_DOCK: u8 = 7;
pub const COPPER_MTN: u8 = 8;
pub const SETTLERS: u8 = 11;
pub const TIMBER_MILL: u8 = 22;
pub const MINING_CAMP: u8 = 23;
pub const MTN: u8 = 25;
pub const SILVER_MTN: u8 = 27;
pub const TIMBER_CAMP: u8 = 28;
pub const VILLAGERS: u8 = 29;
pub const VILLAGERS_DOCK: u8 = 30;
pub const WARRIORS: u8 = 31;
pub const WARRIORS_DOCK: u8 = 32;
const TILE_VARIANTS: u16 = 32;

const COMMON_TILES: [u8; 6] = [FOREST, GRASS, RIVER, GRASS, FOREST, MTN];
const EXOTIC_TILES: [u8; 5] = [COPPER_MTN, TIMBER_MILL, TIMBER_CAMP, MINING_CAMP, SILVER_MTN];
const SETTLER_TILES: [u8; 2] = [SETTLERS, SETTLERS_DOCK];
const VILLAGE_TILES: [u8; 2] = [VILLAGERS, VILLAGERS_DOCK];
const CASTLE_TILES: [u8; 2] = [WARRIORS, WARRIORS_DOCK];

#[derive(Debug, Clone, Copy, Default)]
pub struct HarborMapper;

/// An image placed at `(x, y)` with the given size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub image: u8,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tile", rename_all = "snake_case")]
pub enum TileKind {
    Water,
    LeftEdge,
    RightEdge,
    Land(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSlot {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: TileKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    pub text: String,
    pub size: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarborScene {
    pub clouds: Vec<Sprite>,
    pub tiles: Vec<TileSlot>,
    pub fish: Vec<Sprite>,
    pub ocean_covers: Vec<Sprite>,
    pub ships: Vec<Sprite>,
    pub captions: Vec<Caption>,
    pub offsets: Vec<[f64; 3]>,
}

/// Wrap a horizontal position so a sprite of `width` stays in `[-width, SIZE]`
fn wrap_x(mut x: f64, width: f64) -> f64 {
    while x > SIZE {
        x -= SIZE + width;
    }
    while x < -width {
        x += SIZE + width;
    }
    x
}

fn scale(draw: u16) -> f64 {
    f64::from(draw) / 65535.0
}

/// Settlement bonus a tile contributes to the population trait
pub fn population_bonus(tile: TileKind) -> u32 {
    match tile {
        TileKind::Land(SETTLERS) => 1,
        TileKind::Land(SETTLERS_DOCK) => 2,
        TileKind::Land(VILLAGERS) => 3,
        TileKind::Land(VILLAGERS_DOCK) => 4,
        TileKind::Land(WARRIORS) => 5,
        TileKind::Land(WARRIORS_DOCK) => 6,
        _ => 0,
    }
}

/// `ceil(42 * gasUsed / 15_000_000)`, capped
pub fn fish_count(gas_used: &BigUint) -> usize {
    let max_gas = BigUint::from(MAX_GAS);
    let scaled = gas_used * FISH_DENSITY;
    let count = (scaled + &max_gas - 1u32) / max_gas;
    match usize::try_from(&count) {
        Ok(count) if count <= MAX_FISH => count,
        _ => {
            warn!("Gas used {gas_used} asks for {count} fish, capping at {MAX_FISH}");
            MAX_FISH
        }
    }
}

impl HarborMapper {
    fn clouds(entropy: &mut dyn EntropySource) -> Result<Vec<Sprite>> {
        let mut clouds = Vec::with_capacity(CLOUD_SIZES.len());
        for (index, (width, height)) in CLOUD_SIZES.iter().enumerate() {
            let x = wrap_x(SIZE * scale(entropy.draw_u16()?), *width);
            let top = if index + 1 >= 6 { 0.0 } else { HORIZON - height + 2.0 };
            clouds.push(Sprite {
                image: index as u8 + 1,
                x,
                y: top,
                width: *width,
                height: *height,
            });
        }
        Ok(clouds)
    }

    fn land_tile(draw: u16) -> u8 {
        let pick = |tiles: &[u8]| tiles[usize::from(draw) % tiles.len()];
        if draw > 20000 {
            pick(&COMMON_TILES[..])
        } else if draw > 15000 {
            pick(&EXOTIC_TILES[..])
        } else if draw > 10000 {
            pick(&SETTLER_TILES[..])
        } else if draw > 8000 {
            pick(&VILLAGE_TILES[..])
        } else if draw > 7000 {
            pick(&CASTLE_TILES[..])
        } else {
            (draw % TILE_VARIANTS) as u8
        }
    }

    /// The coast: water until a left edge appears in the first ten slots,
    /// land until a right edge (forced from slot 14 on), then water again
    fn tiles(entropy: &mut dyn EntropySource) -> Result<Vec<TileSlot>> {
        let mut underwater = true;
        let mut tiles = Vec::with_capacity(TILE_COUNT);
        for index in 0..TILE_COUNT {
            let draw = entropy.draw_u16()?;
            let kind = if underwater {
                if draw > 40000 && index < 10 {
                    underwater = false;
                    TileKind::LeftEdge
                } else {
                    TileKind::Water
                }
            } else if draw > 55000 || index >= 14 {
                underwater = true;
                TileKind::RightEdge
            } else {
                TileKind::Land(Self::land_tile(draw))
            };
            tiles.push(TileSlot {
                index,
                x: index as f64 * TILE_WIDTH,
                y: LAND_HORIZON,
                width: TILE_WIDTH,
                height: TILE_HEIGHT,
                kind,
            });
        }
        Ok(tiles)
    }

    fn fish(count: usize, entropy: &mut dyn EntropySource) -> Result<Vec<Sprite>> {
        let mut fish = Vec::with_capacity(count);
        for _ in 0..count {
            let draw = entropy.draw_u16()?;
            let mut kind = match draw {
                d if d > 30000 => 3,
                d if d > 15000 => 2,
                d if d > 10000 => 1,
                d if d > 1000 => 0,
                _ => 4,
            };
            if entropy.draw_u16()? % 2 == 1 {
                kind += 5;
            }
            let x = SIZE * scale(entropy.draw_u16()?);
            let y = SIZE - SIZE / 4.0 * scale(entropy.draw_u16()?);
            fish.push(Sprite {
                image: kind,
                x,
                y,
                width: 64.0,
                height: 32.0,
            });
        }
        fish.sort_by(|a, b| a.y.total_cmp(&b.y));
        Ok(fish)
    }

    fn ocean_covers(entropy: &mut dyn EntropySource) -> Result<Vec<Sprite>> {
        let mut covers = Vec::with_capacity(4);
        for (index, (width, height)) in CLOUD_SIZES.iter().take(4).enumerate() {
            let x = wrap_x(SIZE * scale(entropy.draw_u16()?), *width);
            covers.push(Sprite {
                image: index as u8 + 1,
                x,
                y: SIZE - height,
                width: width * 2.0,
                height: *height,
            });
        }
        Ok(covers)
    }

    fn ships(analysis: &BlockAnalysis, streams: &dyn StreamProvider) -> Result<Vec<Sprite>> {
        let mut ships = Vec::with_capacity(analysis.tx_count());
        for tx in analysis.get_block().get_transactions() {
            let mut entropy = streams.tx_stream(&tx.hash)?;
            let dogger = entropy.draw_u8()? % DOGGER_KINDS;
            let x = SIZE * f64::from(entropy.draw_u8()?) / 255.0;
            let y = HORIZON + 32.0 + SHIP_DEPTH * f64::from(entropy.draw_u8()?) / 256.0;
            ships.push(Sprite {
                image: dogger,
                x,
                y,
                width: DOGGER_WIDTH,
                height: DOGGER_WIDTH * 0.9,
            });
        }
        ships.sort_by(|a, b| a.y.total_cmp(&b.y));
        Ok(ships)
    }

    fn captions(analysis: &BlockAnalysis) -> Vec<Caption> {
        let hash = analysis.get_block().get_hash();
        let hash = if hash.starts_with("0x") {
            hash.to_string()
        } else {
            format!("0x{hash}")
        };
        vec![
            Caption {
                text: hash,
                size: 32.0,
                y: HORIZON / 5.0,
            },
            Caption {
                text: analysis.number.to_string(),
                size: 64.0,
                y: HORIZON / 12.0,
            },
            Caption {
                text: analysis.timestamp.to_string(),
                size: 32.0,
                y: HORIZON / 3.77,
            },
        ]
    }
}

impl StyleMapper for HarborMapper {
    fn style(&self) -> Style {
        Style::Harbor
    }

    fn generate(
        &self,
        analysis: &BlockAnalysis,
        _config: &StyleConfig,
        streams: &dyn StreamProvider,
    ) -> Result<StyleOutput> {
        let mut walker = streams.block_stream(StreamKind::HashWalk)?;
        let clouds = Self::clouds(walker.as_mut())?;
        let tiles = Self::tiles(walker.as_mut())?;

        // keyed on the parsed value so the JSON spelling of gasUsed is irrelevant
        let gas_used_hex = format!("{:#x}", analysis.gas_used);
        let mut gas_walker = streams.gas_stream(&gas_used_hex)?;
        let fish = Self::fish(fish_count(&analysis.gas_used), gas_walker.as_mut())?;

        let ocean_covers = Self::ocean_covers(walker.as_mut())?;
        let offsets = scatter_offsets(analysis.tx_count(), walker.as_mut())?;
        let ships = Self::ships(analysis, streams)?;

        let population: u32 = tiles.iter().map(|t| population_bonus(t.kind)).sum();
        let coastline = tiles
            .iter()
            .filter(|t| matches!(t.kind, TileKind::Land(_)))
            .count();
        debug!(
            "Harbor: {coastline} land tiles, population {population}, {} fish, {} ships",
            fish.len(),
            ships.len()
        );

        let attributes = AttributeSet::new()
            .with("population", f64::from(population))
            .with("coastline", coastline)
            .with("fish", fish.len())
            .with("ships", ships.len());

        Ok(StyleOutput {
            attributes,
            scene: Scene::Harbor(HarborScene {
                clouds,
                tiles,
                fish,
                ocean_covers,
                ships,
                captions: Self::captions(analysis),
                offsets,
            }),
        })
    }
}
