//! Ember Particles - configurable 2D particle field
//!
//! One component covers every classic canvas demo:
//! - Emitter-relative spawning with randomized radius, speed, life and hue
//! - Linear or spiral motion with per-frame damping and fade
//! - Skip, respawn-in-place, or pool-and-trim handling of dead particles
//! - Canvas-style drawing through `ember_core::Surface`

pub mod config;
pub mod curves;
pub mod factory;
pub mod field;
pub mod particle;
pub mod presets;
pub mod rand;

use ember_core::{Surface, Vec2};
use ember_runtime::FrameSystem;

pub use config::{ColorPolicy, DeadPolicy, FieldConfig, FloatRange, LifeRange, Motion};
pub use field::{FieldStats, ParticleField};
pub use particle::{Kinematics, Particle};
pub use rand::ParticleRng;

/// A particle field with a name, so the frame loop can route clicks to it
pub struct NamedField {
    pub name: String,
    pub field: ParticleField,
}

impl NamedField {
    pub fn new(name: impl Into<String>, field: ParticleField) -> Self {
        Self {
            name: name.into(),
            field,
        }
    }
}

impl FrameSystem for NamedField {
    fn update(&mut self, dt: f32) {
        self.field.advance(dt);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.field.render(surface);
    }

    fn pointer(&mut self, at: Vec2) {
        self.field.set_emitter(at);
    }

    fn is_idle(&self) -> bool {
        !self.field.has_live_particle()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
