use crate::config::{Style, StyleConfig};
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Output shape for the `generate` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputArg {
    /// Attributes plus scene
    #[default]
    Render,
    /// Attributes only
    Attributes,
}

impl FromStr for OutputArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "render" => Ok(OutputArg::Render),
            "attributes" => Ok(OutputArg::Attributes),
            _ => Err(format!(
                "Invalid output: {s}. Valid options: render, attributes"
            )),
        }
    }
}

impl std::fmt::Display for OutputArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputArg::Render => write!(f, "render"),
            OutputArg::Attributes => write!(f, "attributes"),
        }
    }
}

/// Style options shared by every generating command
#[derive(Debug, Clone, Default, Args)]
pub struct StyleArgs {
    #[arg(long = "style", help = "Visual style (space, knots, harbor)")]
    pub style: Option<Style>,
    #[arg(long = "config", help = "TOML file with style options")]
    pub config: Option<PathBuf>,
    #[arg(
        long = "mod",
        value_delimiter = ',',
        help = "Modifier values in [0, 1], comma separated"
    )]
    pub mods: Vec<f64>,
    #[arg(long = "color", help = "Base color (#rrggbb); repeat for several")]
    pub colors: Vec<String>,
}

impl StyleArgs {
    /// Resolve the options in order: preset or config file, then the
    /// environment, then the command line flags.
    pub fn resolve(&self) -> Result<StyleConfig> {
        let mut config = match &self.config {
            Some(path) => StyleConfig::load(path)?,
            None => StyleConfig::preset(self.style.unwrap_or_default()),
        }
        .with_env_overrides()?;

        if let Some(style) = self.style {
            if style != config.style {
                config = StyleConfig {
                    preview_random: config.preview_random,
                    ..StyleConfig::preset(style)
                };
            }
        }
        if !self.mods.is_empty() {
            config.mods = self.mods.clone();
        }
        if !self.colors.is_empty() {
            config.colors = self.colors.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Parser)]
#[command(name = "blockness")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "analyze", about = "Print the statistics for a block")]
    Analyze {
        #[arg(help = "Block JSON file")]
        block: PathBuf,
    },
    #[command(name = "generate", about = "Generate attributes and scene for blocks")]
    Generate {
        #[arg(help = "Block JSON files", required = true)]
        blocks: Vec<PathBuf>,
        #[command(flatten)]
        style: StyleArgs,
        #[arg(
            long = "output",
            default_value_t = OutputArg::Render,
            help = "What to print (render, attributes)"
        )]
        output: OutputArg,
    },
    #[command(name = "traits", about = "Print the trait metadata for a block")]
    Traits {
        #[arg(help = "Block JSON file")]
        block: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },
    #[command(
        name = "preview",
        about = "Generate a throwaway preview, randomized if enabled"
    )]
    Preview {
        #[arg(help = "Block JSON file")]
        block: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
        #[arg(long = "random", help = "Use OS randomness instead of block entropy")]
        random: bool,
    },
    #[command(name = "styles", about = "List the style presets")]
    Styles,
}
