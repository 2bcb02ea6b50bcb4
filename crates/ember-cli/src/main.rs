//! Ember CLI - run the particle field demos headless

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{presets, render, scene::SceneArgs, simulate};
use ember_core::Color;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Configurable 2D particle fields, simulated and rendered headless", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a field and print its population per frame
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,

        /// Report every Nth frame
        #[arg(long, default_value = "1")]
        every: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Include draw calls in json output
        #[arg(long)]
        draw_log: bool,
    },

    /// Render a field to a PNG image (headless)
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output image path
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Directory to write every frame into
        #[arg(long)]
        sequence: Option<PathBuf>,

        /// Background color (name, #hex, rgb(), hsl())
        #[arg(long, default_value = "black")]
        background: Color,

        /// Keep a transparent background
        #[arg(long, conflicts_with = "background")]
        transparent: bool,
    },

    /// List built-in presets, or print one as TOML
    Presets {
        /// Preset to print
        #[arg(long)]
        show: Option<String>,

        /// Write the shown preset to a file instead of stdout
        #[arg(long, requires = "show")]
        write: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            scene,
            every,
            format,
            draw_log,
        } => simulate::run(simulate::SimulateArgs {
            scene,
            every,
            format,
            draw_log,
        }),
        Commands::Render {
            scene,
            output,
            sequence,
            background,
            transparent,
        } => render::run(render::RenderArgs {
            scene,
            output,
            sequence,
            background: (!transparent).then_some(background),
        }),
        Commands::Presets { show, write } => presets::run(show.as_deref(), write.as_deref()),
    }
}
