//! Field configuration (parsed from TOML)
//!
//! One `FieldConfig` describes a whole demo variant: how many particles,
//! the ranges they are sampled from, how they move, how they are colored,
//! and what happens to them once their life runs out.

use crate::curves::lerp_f32;
use crate::rand::ParticleRng;
use ember_core::{Color, EmberError, Result, TWO_PI};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest capacity a loaded config may ask for
pub const MAX_CAPACITY: usize = 10_000;

/// Closed float range, written as `[min, max]` in TOML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut ParticleRng) -> f32 {
        lerp_f32(self.min, self.max, rng.next_f32())
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

impl From<[f32; 2]> for FloatRange {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<FloatRange> for [f32; 2] {
    fn from(r: FloatRange) -> Self {
        [r.min, r.max]
    }
}

/// Closed range of life values in frames, written as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct LifeRange {
    pub min: u32,
    pub max: u32,
}

impl LifeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Uniform in [min, max], rounded to the nearest frame
    pub fn sample(&self, rng: &mut ParticleRng) -> u32 {
        lerp_f32(self.min as f32, self.max as f32, rng.next_f32()).round() as u32
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.min && v <= self.max
    }
}

impl From<[u32; 2]> for LifeRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<LifeRange> for [u32; 2] {
    fn from(r: LifeRange) -> Self {
        [r.min, r.max]
    }
}

/// How a fresh particle picks its fill color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorPolicy {
    Fixed {
        value: Color,
    },
    /// Whole-degree hue drawn uniformly from `[min, max]`
    Hue {
        min: f32,
        max: f32,
        #[serde(default = "default_saturation")]
        saturation: f32,
        #[serde(default = "default_lightness")]
        lightness: f32,
    },
}

fn default_saturation() -> f32 {
    1.0
}

fn default_lightness() -> f32 {
    0.5
}

impl ColorPolicy {
    pub fn hue(min: f32, max: f32) -> Self {
        ColorPolicy::Hue {
            min,
            max,
            saturation: default_saturation(),
            lightness: default_lightness(),
        }
    }

    pub fn sample(&self, rng: &mut ParticleRng) -> Color {
        match *self {
            ColorPolicy::Fixed { value } => value,
            ColorPolicy::Hue {
                min,
                max,
                saturation,
                lightness,
            } => {
                let hue = lerp_f32(min, max, rng.next_f32()).floor();
                Color::from_hsl(hue, saturation, lightness)
            }
        }
    }
}

/// What the field does with particles whose life has run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeadPolicy {
    /// Leave dead particles in place; the animation runs down
    Skip,
    /// Reset dead particles in place from the emitter every frame
    Respawn,
    /// Revive dead particles when re-seeding, and trim dead ones while the
    /// collection is over capacity. With `respawn`, dead particles that are
    /// not trimmed are reset in place.
    Recycle {
        #[serde(default)]
        respawn: bool,
    },
}

impl DeadPolicy {
    /// The same policy with respawning switched on or off: `Skip` and
    /// `Respawn` swap, `Recycle` keeps trimming and flips its flag
    pub fn with_respawn(self, enabled: bool) -> Self {
        match self {
            DeadPolicy::Skip | DeadPolicy::Respawn => {
                if enabled {
                    DeadPolicy::Respawn
                } else {
                    DeadPolicy::Skip
                }
            }
            DeadPolicy::Recycle { .. } => DeadPolicy::Recycle { respawn: enabled },
        }
    }
}

/// How particles travel between frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// Straight line along a Cartesian velocity
    Linear,
    /// Heading turns by a per-particle rate each frame, tracing a spiral
    Spiral { angular_change: FloatRange },
}

/// Configuration of one particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Target population
    pub capacity: usize,
    pub radius: FloatRange,
    pub speed: FloatRange,
    pub life: LifeRange,
    /// Opacity of a fresh particle
    pub opacity: f32,
    /// Per-frame multiplier applied to speed (and opacity when `fade` is set)
    pub damping: f32,
    pub fade: bool,
    pub color: ColorPolicy,
    pub policy: DeadPolicy,
    pub motion: Motion,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            capacity: 250,
            radius: FloatRange::new(2.0, 5.0),
            speed: FloatRange::new(2.0, 5.0),
            life: LifeRange::new(75, 125),
            opacity: 1.0,
            damping: 0.98,
            fade: true,
            color: ColorPolicy::Fixed {
                value: Color::WHITE,
            },
            policy: DeadPolicy::Recycle { respawn: true },
            motion: Motion::Linear,
        }
    }
}

impl FieldConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: FieldConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reject configs whose ranges are inverted or whose values make no sense
    pub fn validate(&self) -> Result<()> {
        check_between("capacity", self.capacity as f64, 1.0, MAX_CAPACITY as f64)?;

        let finite = f32::MAX as f64;
        check_order("radius", self.radius.min as f64, self.radius.max as f64)?;
        check_between("radius.min", self.radius.min as f64, 0.0, finite)?;
        check_between("radius.max", self.radius.max as f64, 0.0, finite)?;
        check_order("speed", self.speed.min as f64, self.speed.max as f64)?;
        check_between("speed.min", self.speed.min as f64, 0.0, finite)?;
        check_between("speed.max", self.speed.max as f64, 0.0, finite)?;
        check_order("life", self.life.min as f64, self.life.max as f64)?;

        check_between("opacity", self.opacity as f64, 0.0, 1.0)?;
        if self.damping <= 0.0 {
            return Err(out_of_range("damping", self.damping as f64, 0.0, 1.0));
        }
        check_between("damping", self.damping as f64, 0.0, 1.0)?;

        if let ColorPolicy::Hue {
            min,
            max,
            saturation,
            lightness,
        } = self.color
        {
            check_order("color.hue", min as f64, max as f64)?;
            check_between("color.min", min as f64, 0.0, 360.0)?;
            check_between("color.max", max as f64, 0.0, 360.0)?;
            check_between("color.saturation", saturation as f64, 0.0, 1.0)?;
            check_between("color.lightness", lightness as f64, 0.0, 1.0)?;
        }

        if let Motion::Spiral { angular_change } = self.motion {
            check_order(
                "motion.angular_change",
                angular_change.min as f64,
                angular_change.max as f64,
            )?;
            // At most one full turn per frame
            let turn = TWO_PI as f64;
            check_between("motion.angular_change.min", angular_change.min as f64, -turn, turn)?;
            check_between("motion.angular_change.max", angular_change.max as f64, -turn, turn)?;
        }

        Ok(())
    }
}

fn check_order(field: &str, min: f64, max: f64) -> Result<()> {
    for value in [min, max] {
        if !value.is_finite() {
            return Err(out_of_range(field, value, f64::MIN, f64::MAX));
        }
    }
    if min > max {
        return Err(EmberError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn check_between(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(out_of_range(field, value, min, max));
    }
    Ok(())
}

fn out_of_range(field: &str, value: f64, min: f64, max: f64) -> EmberError {
    EmberError::ValueOutOfRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}
