//! Headless field-to-PNG render command

use super::scene::SceneArgs;
use anyhow::{Context, Result};
use ember_core::Color;
use ember_render::{save_row_png, RasterSurface};
use std::path::PathBuf;

pub struct RenderArgs {
    pub scene: SceneArgs,
    /// Output image path for the final frame
    pub output: PathBuf,
    /// Also write every frame into this directory
    pub sequence: Option<PathBuf>,
    /// Opaque background; `None` keeps transparency
    pub background: Option<Color>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    if let Some(dir) = &args.sequence {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let (width, height) = (args.scene.width, args.scene.height);

    let mut frames = args.scene.build_loop(|| RasterSurface::new(width, height))?;

    args.scene.drive(&mut frames, |report, _, frames| {
        if let Some(dir) = &args.sequence {
            let path = dir.join(format!("frame_{:05}.png", report.frame));
            let surfaces: Vec<&RasterSurface> = frames.layers().iter().map(|l| &l.surface).collect();
            save_row_png(&surfaces, &path, args.background)
                .context("Failed to write sequence frame")?;
        }
        Ok(())
    })?;

    let surfaces: Vec<&RasterSurface> = frames.layers().iter().map(|l| &l.surface).collect();
    save_row_png(&surfaces, &args.output, args.background)
        .with_context(|| format!("Failed to save image to {}", args.output.display()))?;

    for layer in frames.layers() {
        println!(
            "  {:<10} {} live particle(s)",
            layer.system.name,
            layer.system.field.live_count()
        );
    }
    println!(
        "Rendered frame {} ({} layer(s) at {}x{}) to {}",
        frames.frame_count(),
        surfaces.len(),
        width,
        height,
        args.output.display()
    );
    Ok(())
}
