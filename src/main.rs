// This is my main entry point for the blockness CLI
// I'm importing the pipeline pieces I need to turn block files into attributes
use blockness::cli::{OutputArg, StyleArgs};
use blockness::utils::serialize_pretty;
use blockness::{Block, BlockAnalysis, Command, Opt, Pipeline, Style, StyleConfig};
use clap::Parser;
use log::{error, LevelFilter};
use std::process;

fn main() {
    // I initialize logging so I can follow each generation pass
    // Info shows one line per block; RUST_LOG=debug shows the per-stage detail
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap
    let opt = Opt::parse();

    // If something goes wrong, I log the error and exit with code 1
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// I resolve the style options (preset or file, then env, then flags) into a pipeline
fn pipeline_for(style: &StyleArgs) -> blockness::Result<Pipeline> {
    Pipeline::new(style.resolve()?)
}

// This is where I handle all the different CLI commands
// Everything I print is JSON so a renderer or script can consume it
fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // When I only want the parsed fields and transaction statistics of a block
        Command::Analyze { block } => {
            let block = Block::load(&block)?;
            let analysis = BlockAnalysis::new(&block)?;
            println!("{}", serialize_pretty(&analysis.summary())?);
        }
        // When I want the renderer input for one or more blocks
        Command::Generate {
            blocks,
            style,
            output,
        } => {
            let pipeline = pipeline_for(&style)?;
            // I load every block first so a bad file fails before any generation
            let blocks = blocks
                .iter()
                .map(Block::load)
                .collect::<blockness::Result<Vec<_>>>()?;
            // All blocks are generated before anything is printed
            let generations = pipeline.generate_batch(&blocks)?;
            for generation in &generations {
                let text = match output {
                    OutputArg::Render => serialize_pretty(&generation.render_input())?,
                    OutputArg::Attributes => serialize_pretty(generation.attributes())?,
                };
                println!("{text}");
            }
        }
        // When I want the marketplace trait list for a block
        Command::Traits { block, style } => {
            let pipeline = pipeline_for(&style)?;
            let generation = pipeline.recompute(&Block::load(&block)?)?;
            println!("{}", serialize_pretty(&generation.metadata()?)?);
        }
        // When I'm tweaking a style and want a throwaway look at a block
        Command::Preview {
            block,
            style,
            random,
        } => {
            // --random switches on OS randomness on top of whatever the config says
            let mut config = style.resolve()?;
            config.preview_random |= random;
            let pipeline = Pipeline::new(config)?;
            let generation = pipeline.preview(&Block::load(&block)?)?;
            println!("{}", serialize_pretty(&generation.render_input())?);
        }
        // When I want to see what each style ships with
        Command::Styles => {
            for style in Style::ALL {
                let preset = StyleConfig::preset(style);
                let metadata = style.metadata();
                println!("{style}: {}", metadata.name);
                if !metadata.creator_name.is_empty() {
                    println!("  by {}", metadata.creator_name);
                }
                println!("  {}", metadata.description);
                println!("  mods: {:?}", preset.mods);
                println!("  colors: {:?}", preset.colors);
                println!("  background: {}", preset.background);
            }
        }
    }
    Ok(())
}
