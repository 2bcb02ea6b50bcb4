//! Particle record and its per-frame integration

use ember_core::{Color, Polar, Vec2};

/// Source of truth for a particle's motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kinematics {
    /// Cartesian velocity in pixels per frame
    Linear { velocity: Vec2 },
    /// Heading and speed; the heading turns by `angular_change` radians per frame
    Spiral { heading: Polar, angular_change: f32 },
}

/// One animated dot
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub kinematics: Kinematics,
    pub radius: f32,
    pub opacity: f32,
    pub color: Color,
    /// Frames left before the particle expires
    pub life: u32,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Current velocity, derived from the heading for spiral particles
    pub fn velocity(&self) -> Vec2 {
        match self.kinematics {
            Kinematics::Linear { velocity } => velocity,
            Kinematics::Spiral { heading, .. } => heading.to_cartesian(),
        }
    }

    /// Advance one frame. `damping` is the already dt-scaled multiplier.
    ///
    /// Life is counted in frames: it drops by exactly one per call whatever
    /// `dt` is. Dead particles are left untouched.
    pub fn step(&mut self, dt: f32, damping: f32, fade: bool) {
        if !self.is_alive() {
            return;
        }

        match &mut self.kinematics {
            Kinematics::Linear { velocity } => {
                self.position += *velocity * dt;
                *velocity *= damping;
            }
            Kinematics::Spiral {
                heading,
                angular_change,
            } => {
                self.position += heading.to_cartesian() * dt;
                heading.angle += *angular_change * dt;
                heading.magnitude *= damping;
            }
        }

        if fade {
            self.opacity *= damping;
        }
        self.life -= 1;
    }
}
