use crate::core::Rgb;
use crate::error::{ArtError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const STYLE_KEY: &str = "BLOCKNESS_STYLE";
const PREVIEW_KEY: &str = "BLOCKNESS_PREVIEW";

const MAX_MODS: usize = 4;
const MAX_COLORS: usize = 3;

/// Visual styles the pipeline can generate for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Suns in space, seeded stream
    #[default]
    Space,
    /// Scattered torus knots, seeded stream
    Knots,
    /// Seascape with coast tiles, fish and ships, rolling hash walker
    Harbor,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Space, Style::Knots, Style::Harbor];

    pub fn metadata(&self) -> StyleMetadata {
        match self {
            Style::Space => StyleMetadata {
                name: "The Blockness of Space",
                description: "Space isn't empty. Any fixed volume at any given moment varies from the next in content of matter, gas, radiation, temperature, pressure, and field effects. Equally various and unique are the blocks of Ethereum.",
                creator_name: "Cliff Hall",
            },
            Style::Knots => StyleMetadata {
                name: "The Blockness of Space (Knots)",
                description: "Space isn't empty. Any given fixed volume at any given moment varies from the next in content of matter, gas, radiation, temperature, pressure, and field effects. Equally various and unique are the blocks of Ethereum and their content.",
                creator_name: "Cliff Hall",
            },
            Style::Harbor => StyleMetadata {
                name: "Harbor",
                description: "A coastline, its settlements, the fish below and the ships above, all read from one block.",
                creator_name: "",
            },
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Space => write!(f, "space"),
            Style::Knots => write!(f, "knots"),
            Style::Harbor => write!(f, "harbor"),
        }
    }
}

impl std::str::FromStr for Style {
    type Err = ArtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "space" => Ok(Style::Space),
            "knots" => Ok(Style::Knots),
            "harbor" => Ok(Style::Harbor),
            _ => Err(ArtError::Config(format!(
                "Invalid style: {s}. Valid options: space, knots, harbor"
            ))),
        }
    }
}

/// Descriptive metadata published alongside a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub creator_name: &'static str,
}

/// Everything a generation pass needs besides the block itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub style: Style,
    /// Modifier scalars in [0, 1]
    pub mods: Vec<f64>,
    /// Base colors as `#rrggbb` or `#rgb`
    pub colors: Vec<String>,
    pub background: String,
    /// Substitute OS randomness for block entropy; preview only
    #[serde(default)]
    pub preview_random: bool,
}

/// Partial config as read from TOML; missing keys come from the preset
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialStyleConfig {
    style: Option<Style>,
    mods: Option<Vec<f64>>,
    colors: Option<Vec<String>>,
    background: Option<String>,
    preview_random: Option<bool>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::preset(Style::default())
    }
}

impl StyleConfig {
    /// The default options each style ships with
    pub fn preset(style: Style) -> StyleConfig {
        let (mods, colors, background): (Vec<f64>, Vec<&str>, &str) = match style {
            Style::Space => (
                vec![0.65, 0.1, 0.4],
                vec!["#f7f022", "#aa0909", "#45cc66"],
                "#000",
            ),
            Style::Knots => (vec![0.4, 0.1, 0.4], vec!["#fff000"], "#000000"),
            Style::Harbor => (vec![], vec![], "#000"),
        };
        StyleConfig {
            style,
            mods,
            colors: colors.into_iter().map(String::from).collect(),
            background: background.to_string(),
            preview_random: false,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<StyleConfig> {
        let partial: PartialStyleConfig = toml::from_str(text)?;
        let preset = Self::preset(partial.style.unwrap_or_default());
        let config = StyleConfig {
            style: preset.style,
            mods: partial.mods.unwrap_or(preset.mods),
            colors: partial.colors.unwrap_or(preset.colors),
            background: partial.background.unwrap_or(preset.background),
            preview_random: partial.preview_random.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<StyleConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ArtError::Io(format!("Failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded {} style config from {}", config.style, path.display());
        Ok(config)
    }

    /// Apply `BLOCKNESS_STYLE` and `BLOCKNESS_PREVIEW` from the environment.
    /// Switching style through the environment resets the options to that
    /// style's preset.
    pub fn with_env_overrides(self) -> Result<StyleConfig> {
        let mut config = self;
        if let Ok(style) = env::var(STYLE_KEY) {
            let style: Style = style.parse()?;
            if style != config.style {
                config = StyleConfig {
                    preview_random: config.preview_random,
                    ..Self::preset(style)
                };
            }
        }
        if let Ok(flag) = env::var(PREVIEW_KEY) {
            config.preview_random = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mods.len() > MAX_MODS {
            return Err(ArtError::Config(format!(
                "At most {MAX_MODS} modifiers are allowed, got {}",
                self.mods.len()
            )));
        }
        if self.colors.len() > MAX_COLORS {
            return Err(ArtError::Config(format!(
                "At most {MAX_COLORS} colors are allowed, got {}",
                self.colors.len()
            )));
        }
        for (i, value) in self.mods.iter().enumerate() {
            if !(0.0..=1.0).contains(value) {
                return Err(ArtError::Config(format!(
                    "mod{} must be between 0 and 1, got {value}",
                    i + 1
                )));
            }
        }
        for color in self.colors.iter().chain(std::iter::once(&self.background)) {
            Rgb::parse(color)?;
        }
        if self.style != Style::Harbor && (self.mods.is_empty() || self.colors.is_empty()) {
            return Err(ArtError::Config(format!(
                "The {} style needs at least one modifier and one color",
                self.style
            )));
        }
        Ok(())
    }

    /// Modifier `index` (zero-based); unset modifiers fall back to the preset
    pub fn modifier(&self, index: usize) -> f64 {
        self.mods
            .get(index)
            .copied()
            .or_else(|| Self::preset(self.style).mods.get(index).copied())
            .unwrap_or(0.0)
    }

    /// Base color `index` (zero-based); unset colors fall back to the preset,
    /// then to the first configured color
    pub fn color(&self, index: usize) -> Result<Rgb> {
        let preset = Self::preset(self.style);
        let text = self
            .colors
            .get(index)
            .or_else(|| preset.colors.get(index))
            .or_else(|| self.colors.first())
            .ok_or_else(|| ArtError::Config(format!("No color {} configured", index + 1)))?;
        Rgb::parse(text)
    }

    pub fn color_text(&self, index: usize) -> Option<String> {
        let preset = Self::preset(self.style);
        self.colors
            .get(index)
            .or_else(|| preset.colors.get(index))
            .cloned()
    }
}
