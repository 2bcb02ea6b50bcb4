//! Particle factory: samples a fresh particle at the emitter

use crate::config::{FieldConfig, Motion};
use crate::particle::{Kinematics, Particle};
use crate::rand::ParticleRng;
use ember_core::{Polar, Vec2};

/// Create a particle at `emitter` with a uniformly random heading and
/// speed, radius, life and color drawn from the config ranges.
pub fn create(emitter: Vec2, config: &FieldConfig, rng: &mut ParticleRng) -> Particle {
    let heading = Polar::new(rng.angle(), config.speed.sample(rng));
    let radius = config.radius.sample(rng);
    let life = config.life.sample(rng);
    let color = config.color.sample(rng);

    let kinematics = match config.motion {
        Motion::Linear => Kinematics::Linear {
            velocity: heading.to_cartesian(),
        },
        Motion::Spiral { angular_change } => Kinematics::Spiral {
            heading,
            angular_change: angular_change.sample(rng),
        },
    };

    Particle {
        position: emitter,
        kinematics,
        radius,
        opacity: config.opacity,
        color,
        life,
    }
}
