//! Headless simulation with per-frame population stats

use super::scene::SceneArgs;
use anyhow::{bail, Result};
use ember_particles::FieldStats;
use ember_render::{DrawCommand, RecordingSurface};
use serde::Serialize;

pub struct SimulateArgs {
    pub scene: SceneArgs,
    /// Report every Nth frame (the last frame is always reported)
    pub every: u64,
    /// "text" or "json"
    pub format: String,
    /// Include each reported frame's draw calls (json only)
    pub draw_log: bool,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    frame: u64,
    dt: f32,
    events: usize,
    layer: &'a str,
    skipped: bool,
    stats: FieldStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    draw: Option<&'a [DrawCommand]>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let json = match args.format.as_str() {
        "json" => true,
        "text" => false,
        other => bail!("Unknown format '{}'; expected text or json", other),
    };
    if args.draw_log && !json {
        bail!("--draw-log requires --format json");
    }
    let every = args.every.max(1);
    let last = args.scene.frames;
    let (width, height) = (args.scene.width, args.scene.height);

    let mut frames = args
        .scene
        .build_loop(|| RecordingSurface::new(width, height))?;

    if !json {
        println!(
            "{:>6} {:>7} {:<10} {:>6} {:>6} {:>8}",
            "frame", "dt", "layer", "held", "live", "capacity"
        );
    }

    let mut peak = 0;
    args.scene.drive(&mut frames, |report, dt, frames| {
        let reported = report.frame % every == 0 || report.frame == last;

        for layer in frames.layers() {
            let stats = layer.system.field.stats();
            peak = peak.max(stats.len);
            if !reported {
                continue;
            }

            // A skipped layer records no calls for the frame
            let skipped = layer.surface.commands().is_empty();
            if json {
                let line = FrameLine {
                    frame: report.frame,
                    dt,
                    events: report.events,
                    layer: &layer.system.name,
                    skipped,
                    stats,
                    draw: args.draw_log.then(|| layer.surface.commands()),
                };
                println!("{}", serde_json::to_string(&line)?);
            } else {
                println!(
                    "{:>6} {:>7.3} {:<10} {:>6} {:>6} {:>8}",
                    report.frame, dt, layer.system.name, stats.len, stats.live, stats.capacity
                );
            }
        }

        // Only the current frame's calls matter
        for index in 0..frames.layers().len() {
            if let Some(layer) = frames.layer_mut(index) {
                layer.surface.reset();
            }
        }
        Ok(())
    })?;

    log::info!(
        "[simulate] {} frame(s), peak population {}",
        frames.frame_count(),
        peak
    );
    Ok(())
}
