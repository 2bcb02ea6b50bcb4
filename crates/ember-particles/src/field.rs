//! The particle field: owns the particle collection and its emitter

use crate::config::{DeadPolicy, FieldConfig};
use crate::factory;
use crate::particle::Particle;
use crate::rand::ParticleRng;
use ember_core::{Surface, Vec2, TWO_PI};
use serde::Serialize;

/// Snapshot of a field's population, for drivers and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    /// Number of `advance` calls so far
    pub frame: u64,
    /// Particles held, alive or dead
    pub len: usize,
    pub live: usize,
    pub capacity: usize,
}

/// A configurable particle field.
///
/// The field starts empty and without an emitter. Nothing spawns until
/// [`set_emitter`](Self::set_emitter) gives it a position; until then
/// `advance` and `render` are no-ops.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    emitter: Option<Vec2>,
    rng: ParticleRng,
    frame: u64,
}

impl ParticleField {
    pub fn new(config: FieldConfig, rng: ParticleRng) -> Self {
        Self {
            particles: Vec::with_capacity(config.capacity),
            config,
            emitter: None,
            rng,
            frame: 0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn emitter(&self) -> Option<Vec2> {
        self.emitter
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// True iff at least one particle still has life left
    pub fn has_live_particle(&self) -> bool {
        self.particles.iter().any(Particle::is_alive)
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            frame: self.frame,
            len: self.particles.len(),
            live: self.live_count(),
            capacity: self.config.capacity,
        }
    }

    /// Move the emitter and re-seed `capacity` particles from it.
    ///
    /// Under `Skip` and `Respawn` the whole collection is replaced. Under
    /// `Recycle` each new particle reuses a dead slot when one exists and is
    /// appended otherwise, so the collection may temporarily exceed capacity.
    pub fn set_emitter(&mut self, point: Vec2) {
        self.emitter = Some(point);
        let capacity = self.config.capacity;

        match self.config.policy {
            DeadPolicy::Skip | DeadPolicy::Respawn => {
                self.particles.clear();
                for _ in 0..capacity {
                    let p = factory::create(point, &self.config, &mut self.rng);
                    self.particles.push(p);
                }
            }
            DeadPolicy::Recycle { .. } => {
                let mut revived = 0;
                for _ in 0..capacity {
                    let fresh = factory::create(point, &self.config, &mut self.rng);
                    match self.particles.iter_mut().find(|p| !p.is_alive()) {
                        Some(slot) => {
                            *slot = fresh;
                            revived += 1;
                        }
                        None => self.particles.push(fresh),
                    }
                }
                log::debug!(
                    "[particles] Seeded at ({:.1}, {:.1}): {} revived, {} allocated, {} held",
                    point.x,
                    point.y,
                    revived,
                    capacity - revived,
                    self.particles.len()
                );
            }
        }
    }

    /// Toggle respawning of dead particles at runtime.
    ///
    /// Switches between `Skip` and `Respawn`, or flips the `respawn` flag of
    /// `Recycle`.
    pub fn set_respawn(&mut self, enabled: bool) {
        self.config.policy = self.config.policy.with_respawn(enabled);
    }

    /// Advance every live particle by one frame.
    ///
    /// Dead particles are handled by the dead policy: trimmed while the
    /// collection is over capacity (`Recycle`), reset in place (`Respawn`,
    /// or `Recycle` with respawn) or left alone. A particle handled this way
    /// does not move until the next frame.
    pub fn advance(&mut self, dt: f32) {
        self.frame += 1;
        let Some(emitter) = self.emitter else {
            return;
        };

        let damping = self.config.damping.powf(dt);
        let fade = self.config.fade;
        let capacity = self.config.capacity;
        let (trim, respawn) = match self.config.policy {
            DeadPolicy::Skip => (false, false),
            DeadPolicy::Respawn => (false, true),
            DeadPolicy::Recycle { respawn } => (true, respawn),
        };

        let mut trimmed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_alive() {
                self.particles[i].step(dt, damping, fade);
            } else if trim && self.particles.len() > capacity {
                // Order-preserving removal
                self.particles.remove(i);
                trimmed += 1;
                continue;
            } else if respawn {
                self.particles[i] = factory::create(emitter, &self.config, &mut self.rng);
            }
            i += 1;
        }

        if trimmed > 0 {
            log::debug!(
                "[particles] Trimmed {} dead particle(s), {} held",
                trimmed,
                self.particles.len()
            );
        }
    }

    /// Paint every live particle as a filled circle. Paint state is
    /// restored afterwards.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        for p in self.particles.iter().filter(|p| p.is_alive()) {
            surface.set_global_alpha(p.opacity);
            surface.set_fill_color(p.color);
            surface.begin_path();
            surface.arc(p.position, p.radius, 0.0, TWO_PI);
            surface.fill();
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FloatRange, LifeRange, Motion};
    use crate::particle::Kinematics;
    use ember_core::Polar;
    use ember_render::RecordingSurface;

    fn field(policy: DeadPolicy, capacity: usize) -> ParticleField {
        let config = FieldConfig {
            capacity,
            policy,
            ..Default::default()
        };
        ParticleField::new(config, ParticleRng::new(42))
    }

    /// Kill every particle by running its life out
    fn expire_all(field: &mut ParticleField) {
        let longest = field.config.life.max;
        for _ in 0..longest {
            field.advance(1.0);
        }
    }

    #[test]
    fn starts_empty_until_emitter_set() {
        let mut f = field(DeadPolicy::Respawn, 10);
        assert!(f.is_empty());
        assert!(f.emitter().is_none());
        f.advance(1.0);
        assert!(f.is_empty());
        assert!(!f.has_live_particle());

        let mut surface = RecordingSurface::new(300, 300);
        f.render(&mut surface);
        assert_eq!(surface.circles().len(), 0);

        f.set_emitter(Vec2::new(150.0, 150.0));
        assert_eq!(f.len(), 10);
        assert!(f.has_live_particle());
        assert!(f.particles().iter().all(|p| p.position == Vec2::new(150.0, 150.0)));
    }

    #[test]
    fn life_drops_by_one_per_advance() {
        let mut f = field(DeadPolicy::Skip, 50);
        f.set_emitter(Vec2::new(10.0, 10.0));
        let before: Vec<u32> = f.particles().iter().map(|p| p.life).collect();

        for dt in [1.0, 0.25, 3.0] {
            f.advance(dt);
        }
        for (p, life) in f.particles().iter().zip(before) {
            assert_eq!(p.life, life - 3);
        }
    }

    #[test]
    fn damping_applies_exactly_once_at_unit_dt() {
        let mut f = field(DeadPolicy::Skip, 5);
        f.set_emitter(Vec2::ZERO);
        let before: Vec<(f32, f32)> = f
            .particles()
            .iter()
            .map(|p| (p.opacity, p.velocity().length()))
            .collect();

        f.advance(1.0);
        for (p, (opacity, speed)) in f.particles().iter().zip(before) {
            assert!((p.opacity - opacity * 0.98).abs() < 1e-6);
            assert!((p.velocity().length() - speed * 0.98).abs() < 1e-4);
        }
    }

    #[test]
    fn damping_compounds_over_longer_frames() {
        let mut f = field(DeadPolicy::Skip, 5);
        f.set_emitter(Vec2::ZERO);
        let before: Vec<(f32, f32)> = f
            .particles()
            .iter()
            .map(|p| (p.opacity, p.velocity().length()))
            .collect();

        // A double-length frame damps twice, not by 0.98 * 2
        f.advance(2.0);
        let factor = 0.98_f32 * 0.98;
        for (p, (opacity, speed)) in f.particles().iter().zip(before) {
            assert!((p.opacity - opacity * factor).abs() < 1e-6);
            assert!((p.velocity().length() - speed * factor).abs() < 1e-4);
        }
    }

    #[test]
    fn skip_policy_runs_down() {
        let mut f = field(DeadPolicy::Skip, 20);
        f.set_emitter(Vec2::new(50.0, 50.0));
        expire_all(&mut f);

        assert_eq!(f.len(), 20);
        assert!(!f.has_live_particle());
        assert_eq!(f.live_count(), 0);

        f.advance(1.0);
        assert_eq!(f.len(), 20);
        assert!(!f.has_live_particle());
    }

    #[test]
    fn respawn_policy_keeps_size_and_population() {
        let mut f = field(DeadPolicy::Respawn, 30);
        f.set_emitter(Vec2::new(50.0, 50.0));
        for _ in 0..400 {
            f.advance(1.0);
            assert_eq!(f.len(), 30);
        }
        assert!(f.has_live_particle());
    }

    #[test]
    fn set_emitter_replaces_under_respawn() {
        let mut f = field(DeadPolicy::Respawn, 30);
        f.set_emitter(Vec2::new(1.0, 1.0));
        f.advance(1.0);
        f.set_emitter(Vec2::new(9.0, 9.0));
        assert_eq!(f.len(), 30);
        assert!(f.particles().iter().all(|p| p.position == Vec2::new(9.0, 9.0)));
    }

    #[test]
    fn recycle_burst_grows_then_trims_back() {
        let mut f = field(DeadPolicy::Recycle { respawn: false }, 25);
        f.set_emitter(Vec2::new(10.0, 10.0));
        assert_eq!(f.len(), 25);

        // A second click while everything is alive appends a full burst
        f.set_emitter(Vec2::new(20.0, 20.0));
        assert_eq!(f.len(), 50);

        // Run the first generation out; the second has at most the same life
        for _ in 0..f.config.life.max {
            f.advance(1.0);
            assert!(f.len() <= 50);
        }
        assert!(!f.has_live_particle());

        f.advance(1.0);
        assert_eq!(f.len(), 25);
    }

    #[test]
    fn recycle_revives_dead_slots_first() {
        let mut f = field(DeadPolicy::Recycle { respawn: false }, 25);
        f.set_emitter(Vec2::new(10.0, 10.0));
        expire_all(&mut f);
        assert_eq!(f.len(), 25);

        f.set_emitter(Vec2::new(99.0, 1.0));
        assert_eq!(f.len(), 25);
        assert_eq!(f.live_count(), 25);
        assert!(f.particles().iter().all(|p| p.position == Vec2::new(99.0, 1.0)));
    }

    #[test]
    fn recycle_with_respawn_stays_populated() {
        let mut f = field(DeadPolicy::Recycle { respawn: true }, 40);
        f.set_emitter(Vec2::new(5.0, 5.0));
        for _ in 0..300 {
            f.advance(1.0);
            assert_eq!(f.len(), 40);
        }
        assert!(f.has_live_particle());
    }

    #[test]
    fn set_respawn_toggles_policy() {
        let mut f = field(DeadPolicy::Skip, 5);
        f.set_respawn(true);
        assert_eq!(f.config().policy, DeadPolicy::Respawn);
        f.set_respawn(false);
        assert_eq!(f.config().policy, DeadPolicy::Skip);

        let mut g = field(DeadPolicy::Recycle { respawn: false }, 5);
        g.set_respawn(true);
        assert_eq!(g.config().policy, DeadPolicy::Recycle { respawn: true });
    }

    #[test]
    fn dead_particles_are_never_drawn() {
        let mut f = field(DeadPolicy::Skip, 40);
        f.set_emitter(Vec2::new(100.0, 100.0));

        let mut surface = RecordingSurface::new(200, 200);
        for _ in 0..200 {
            f.advance(1.0);
            surface.clear();
            f.render(&mut surface);
            assert_eq!(surface.circles().len(), f.live_count());
        }
        assert_eq!(surface.circles().len(), 0);
    }

    #[test]
    fn render_paints_particle_state() {
        let mut f = field(DeadPolicy::Skip, 3);
        f.set_emitter(Vec2::new(30.0, 40.0));
        f.advance(1.0);

        let mut surface = RecordingSurface::new(100, 100);
        f.render(&mut surface);
        let circles = surface.circles();
        assert_eq!(circles.len(), 3);
        for (c, p) in circles.iter().zip(f.particles()) {
            assert_eq!(c.center, p.position);
            assert_eq!(c.radius, p.radius);
            assert_eq!(c.alpha, p.opacity);
            assert_eq!(c.color, p.color);
        }
        assert!(surface.is_balanced());
    }

    #[test]
    fn spiral_without_turning_is_a_straight_line() {
        let config = FieldConfig {
            capacity: 8,
            policy: DeadPolicy::Skip,
            motion: Motion::Spiral {
                angular_change: FloatRange::new(0.0, 0.0),
            },
            life: LifeRange::new(50, 50),
            ..Default::default()
        };
        let mut f = ParticleField::new(config, ParticleRng::new(17));
        let origin = Vec2::new(100.0, 100.0);
        f.set_emitter(origin);

        let heading_of = |p: &Particle| match p.kinematics {
            Kinematics::Spiral { heading, .. } => heading.angle,
            Kinematics::Linear { .. } => unreachable!(),
        };
        let headings: Vec<f32> = f.particles().iter().map(heading_of).collect();
        for _ in 0..20 {
            f.advance(1.0);
        }
        for (p, angle) in f.particles().iter().zip(headings) {
            assert_eq!(heading_of(p), angle);

            // Displacement is parallel to, and along, the initial heading
            let travelled = p.position - origin;
            let dir = Polar::new(angle, 1.0).to_cartesian();
            let cross = travelled.x * dir.y - travelled.y * dir.x;
            let dot = travelled.x * dir.x + travelled.y * dir.y;
            assert!(cross.abs() < 1e-2, "cross {cross}");
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn stats_report_population() {
        let mut f = field(DeadPolicy::Skip, 12);
        f.set_emitter(Vec2::ZERO);
        f.advance(1.0);
        let stats = f.stats();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.len, 12);
        assert_eq!(stats.live, 12);
        assert_eq!(stats.capacity, 12);
    }
}
