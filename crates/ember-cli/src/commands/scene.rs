//! Shared setup for commands that run a particle field headless

use anyhow::{Context, Result};
use clap::Args;
use ember_core::{Surface, Vec2};
use ember_particles::{presets, FieldConfig, NamedField, ParticleField, ParticleRng};
use ember_runtime::{FrameClock, FrameLoop, FrameReport, PointerEvent};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A pointer click scheduled for a given frame
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub frame: u64,
    pub at: Vec2,
    /// Layer the click is aimed at; `None` reaches every layer
    pub layer: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Built-in preset (basic, fountain, recycling, polka, swirl); repeat
    /// for side-by-side layers
    #[arg(long = "preset", default_value = "recycling")]
    pub presets: Vec<String>,

    /// Field config TOML file; repeatable, replaces --preset
    #[arg(long = "config")]
    pub configs: Vec<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value = "120")]
    pub frames: u64,

    /// Surface width in pixels, per layer
    #[arg(long, default_value = "300")]
    pub width: u32,

    /// Surface height in pixels, per layer
    #[arg(long, default_value = "300")]
    pub height: u32,

    /// Initial emitter position (x,y); defaults to the surface center
    #[arg(long, value_parser = parse_point)]
    pub emitter: Option<Vec2>,

    /// Extra click before a frame (FRAME:X,Y or FRAME:X,Y@LAYER); repeatable
    #[arg(long = "click", value_parser = parse_click)]
    pub clicks: Vec<Click>,

    /// RNG seed; random when omitted
    #[arg(long)]
    pub seed: Option<u32>,

    /// Override every layer's respawn setting
    #[arg(long)]
    pub respawn: Option<bool>,

    /// Fixed frame delta as a multiple of a 60Hz frame
    #[arg(long, default_value = "1.0", conflicts_with = "realtime", value_parser = parse_dt)]
    pub dt: f32,

    /// Pace frames at 60Hz and use measured deltas
    #[arg(long)]
    pub realtime: bool,

    /// Skip idle fields instead of clearing and redrawing them
    #[arg(long)]
    pub skip_idle: bool,
}

pub fn parse_point(s: &str) -> Result<Vec2, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok(Vec2::new(x, y))
}

pub fn parse_dt(s: &str) -> Result<f32, String> {
    let dt: f32 = s.trim().parse().map_err(|e| format!("invalid dt: {}", e))?;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(format!("dt must be a positive number, got {}", s));
    }
    Ok(dt)
}

pub fn parse_click(s: &str) -> Result<Click, String> {
    let (frame, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:X,Y, got '{}'", s))?;
    let frame: u64 = frame
        .trim()
        .parse()
        .map_err(|e| format!("invalid frame: {}", e))?;
    if frame == 0 {
        return Err("frames are numbered from 1".to_string());
    }
    let (point, layer) = match rest.split_once('@') {
        Some((point, layer)) if !layer.trim().is_empty() => (point, Some(layer.trim().to_string())),
        Some(_) => return Err(format!("missing layer name after '@' in '{}'", s)),
        None => (rest, None),
    };
    Ok(Click {
        frame,
        at: parse_point(point)?,
        layer,
    })
}

/// One field layer to build
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub name: String,
    pub config: FieldConfig,
}

impl SceneArgs {
    /// Layer configs in draw order, with the respawn override applied.
    /// Config files win over presets; a file is named after its stem.
    pub fn load_layers(&self) -> Result<Vec<LayerSpec>> {
        let mut layers = Vec::new();
        if self.configs.is_empty() {
            for name in &self.presets {
                layers.push(LayerSpec {
                    name: name.clone(),
                    config: presets::by_name(name)?,
                });
            }
        } else {
            for path in &self.configs {
                let config = FieldConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "field".to_string());
                layers.push(LayerSpec { name, config });
            }
        }

        if let Some(respawn) = self.respawn {
            for layer in &mut layers {
                layer.config.policy = layer.config.policy.with_respawn(respawn);
            }
        }
        Ok(layers)
    }

    pub fn rng(&self) -> ParticleRng {
        match self.seed {
            Some(seed) => ParticleRng::new(seed),
            None => ParticleRng::from_time(),
        }
    }

    pub fn clock(&self) -> FrameClock {
        if self.realtime {
            FrameClock::new()
        } else {
            FrameClock::fixed(self.dt)
        }
    }

    /// Frame loop with one layer per preset or config, each drawing onto its
    /// own surface from `make_surface`, and the initial emitter click queued
    /// for frame 1
    pub fn build_loop<S, F>(&self, mut make_surface: F) -> Result<FrameLoop<NamedField, S>>
    where
        S: Surface,
        F: FnMut() -> S,
    {
        let layers = self.load_layers()?;
        let mut rng = self.rng();
        let mut frames = FrameLoop::new().with_skip_idle(self.skip_idle);

        for layer in layers {
            log::info!(
                "[scene] '{}': capacity {}, {:?}, {:?}",
                layer.name,
                layer.config.capacity,
                layer.config.policy,
                layer.config.motion
            );
            let field = ParticleField::new(layer.config, rng.fork());
            frames.add_layer(NamedField::new(layer.name, field), make_surface());
        }

        let center = Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        frames.push_pointer(PointerEvent::click(self.emitter.unwrap_or(center)));
        Ok(frames)
    }

    /// Run the configured number of frames, queueing scheduled clicks
    /// before their frame and calling `on_frame` after each one
    pub fn drive<S, F>(&self, frames: &mut FrameLoop<NamedField, S>, mut on_frame: F) -> Result<()>
    where
        S: Surface,
        F: FnMut(&FrameReport, f32, &mut FrameLoop<NamedField, S>) -> Result<()>,
    {
        let mut clock = self.clock();
        let frame_time = Duration::from_secs_f64(clock.frame_time());

        for frame in 1..=self.frames {
            let started = Instant::now();
            for click in self.clicks.iter().filter(|c| c.frame == frame) {
                let event = match &click.layer {
                    Some(layer) => PointerEvent::click_on(layer.as_str(), click.at),
                    None => PointerEvent::click(click.at),
                };
                frames.push_pointer(event);
            }

            let dt = clock.tick();
            let report = frames.frame(dt);
            on_frame(&report, dt, frames)?;

            if self.realtime {
                std::thread::sleep(frame_time.saturating_sub(started.elapsed()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ember_particles::DeadPolicy;
    use ember_render::RecordingSurface;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        scene: SceneArgs,
    }

    fn args(extra: &[&str]) -> SceneArgs {
        let mut argv = vec!["ember"];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).scene
    }

    #[test]
    fn parses_points_and_clicks() {
        assert_eq!(parse_point("3, 4.5").unwrap(), Vec2::new(3.0, 4.5));
        assert!(parse_point("3").is_err());
        assert_eq!(
            parse_click("12:10,20").unwrap(),
            Click {
                frame: 12,
                at: Vec2::new(10.0, 20.0),
                layer: None,
            }
        );
        assert_eq!(
            parse_click("2:1,1@swirl").unwrap().layer.as_deref(),
            Some("swirl")
        );
        assert!(parse_click("0:1,1").is_err());
        assert!(parse_click("1,1").is_err());
        assert!(parse_click("1:1,1@").is_err());
    }

    #[test]
    fn dt_must_be_positive_and_finite() {
        assert_eq!(parse_dt("0.5").unwrap(), 0.5);
        for bad in ["0", "-1", "NaN", "inf", "fast"] {
            assert!(parse_dt(bad).is_err(), "{bad}");
        }
        assert!(Harness::try_parse_from(["ember", "--dt", "-1"]).is_err());
        assert_eq!(args(&["--dt", "2"]).dt, 2.0);
    }

    #[test]
    fn default_scene_is_one_recycling_layer() {
        let layers = args(&[]).load_layers().unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "recycling");
    }

    #[test]
    fn respawn_override_changes_every_layer() {
        let scene = args(&["--preset", "basic", "--preset", "polka", "--respawn", "true"]);
        let layers = scene.load_layers().unwrap();
        assert_eq!(layers[0].config.policy, DeadPolicy::Respawn);
        assert_eq!(layers[1].config.policy, DeadPolicy::Recycle { respawn: true });
    }

    #[test]
    fn unknown_preset_fails() {
        let scene = args(&["--preset", "nope"]);
        assert!(scene.load_layers().is_err());
    }

    #[test]
    fn config_file_overrides_preset() {
        let dir = std::env::temp_dir().join(format!("ember_cli_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.toml");
        std::fs::write(&path, "capacity = 3\npolicy = { mode = \"skip\" }\n").unwrap();

        let scene = args(&["--preset", "swirl", "--config", path.to_str().unwrap()]);
        let layers = scene.load_layers().unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].config.capacity, 3);
        assert_eq!(layers[0].name, "tiny");
    }

    #[test]
    fn drive_applies_scheduled_clicks() {
        let scene = args(&[
            "--preset",
            "polka",
            "--frames",
            "5",
            "--seed",
            "7",
            "--emitter",
            "10,10",
            "--click",
            "3:200,100",
        ]);
        let mut frames = scene.build_loop(|| RecordingSurface::new(300, 300)).unwrap();

        let mut lens = Vec::new();
        scene
            .drive(&mut frames, |report, dt, frames| {
                assert_eq!(dt, 1.0);
                let field = &frames.layers()[0].system.field;
                lens.push((report.frame, report.events, field.len()));
                Ok(())
            })
            .unwrap();

        // Second click while the first burst is alive appends another 25
        assert_eq!(lens[0], (1, 1, 25));
        assert_eq!(lens[2], (3, 1, 50));
        assert_eq!(
            frames.layers()[0].system.field.emitter(),
            Some(Vec2::new(200.0, 100.0))
        );
    }

    #[test]
    fn demo_page_runs_three_layers() {
        let scene = args(&[
            "--preset", "recycling", "--preset", "polka", "--preset", "swirl", "--respawn", "true",
            "--frames", "200", "--seed", "3", "--click", "50:20,20@polka",
        ]);
        let mut frames = scene.build_loop(|| RecordingSurface::new(300, 300)).unwrap();
        scene.drive(&mut frames, |_, _, _| Ok(())).unwrap();

        let names: Vec<&str> = frames.layers().iter().map(|l| l.system.name.as_str()).collect();
        assert_eq!(names, ["recycling", "polka", "swirl"]);
        for layer in frames.layers() {
            let field = &layer.system.field;
            assert!(field.has_live_particle(), "{}", layer.system.name);
            assert_eq!(field.len(), field.config().capacity);
        }

        let center = Some(Vec2::new(150.0, 150.0));
        assert_eq!(frames.layers()[0].system.field.emitter(), center);
        assert_eq!(frames.layers()[1].system.field.emitter(), Some(Vec2::new(20.0, 20.0)));
        assert_eq!(frames.layers()[2].system.field.emitter(), center);
    }
}
