use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use block_tower::core::SimulationSettings;
use block_tower::engine::renderer::DrawList;
use block_tower::game::stability;

#[derive(Parser)]
#[command(name = "block-tower", version, about = "Block placement physics and tower stability checks")]
struct Cli {
    /// JSON settings file; missing fields use the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer stability requests read line by line from stdin
    Serve,

    /// Check the stability of the structure in FILE
    Check {
        /// JSON array of {x, y, w, h} blocks
        file: PathBuf,
    },

    /// Simulate the structure in FILE and draw it as SVG
    Render {
        /// JSON array of {x, y, w, h} blocks
        file: PathBuf,

        /// Frames to simulate before drawing
        #[arg(long, default_value_t = 0)]
        frames: u32,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Draw blocks as chocolate bars
        #[arg(long)]
        chocolate: bool,

        /// Draw collider outlines on top
        #[arg(long)]
        overlay: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => SimulationSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => SimulationSettings::default(),
    };

    match cli.command {
        Command::Serve => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            stability::serve(stdin.lock(), stdout.lock(), &settings)?;
        }
        Command::Check { file } => {
            let blocks = read_request(&file)?;
            let stable = stability::check_stability(&blocks, &settings)?;
            println!("{stable}");
        }
        Command::Render {
            file,
            frames,
            output,
            chocolate,
            overlay,
        } => {
            let blocks = read_request(&file)?;
            let mut scene = stability::build_scene(&blocks, &settings);
            scene.set_chocolate_blocks(chocolate);
            scene.overlay_mut().set_enabled(overlay);

            for _ in 0..frames {
                scene.step();
            }

            let mut list = DrawList::new();
            scene.render(&mut list)?;
            let (width, height) = scene.stage_size();
            let svg = list.to_svg(width, height);

            match output {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => io::stdout().write_all(svg.as_bytes())?,
            }
        }
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<Vec<stability::SerializedBlock>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let blocks = stability::parse_request(data.trim())?;
    info!("Loaded {} blocks from {}", blocks.len(), path.display());
    Ok(blocks)
}
