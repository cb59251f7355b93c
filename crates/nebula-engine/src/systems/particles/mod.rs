//! Particle registry: spawning, simulation, cap enforcement, drawing.
//!
//! All particles from every effect recipe (including ship trails) live in
//! this one registry and advance in one pass — there is exactly one particle
//! loop in the engine.

mod color;
mod kind;
mod particle;
mod rng;

pub use color::Color;
pub use kind::{building_color, resource_color, KindProfile, Motion, ParticleKind, VelocityDist};
pub use particle::Particle;
pub use rng::Rng;

use glam::Vec2;

use crate::renderer::draw::FrameBuffer;

/// Owns the live particle list and the RNG all spawns draw from.
pub struct ParticleState {
    particles: Vec<Particle>,
    pub rng: Rng,
}

impl ParticleState {
    pub fn new(seed: u64) -> Self {
        ParticleState {
            particles: Vec::with_capacity(512),
            rng: Rng::new(seed),
        }
    }

    /// Spawn `count` particles of one kind at an origin point.
    pub fn spawn(&mut self, kind: ParticleKind, origin: Vec2, count: usize) {
        for _ in 0..count {
            self.particles.push(Particle::spawn(kind, origin, &mut self.rng));
        }
    }

    /// Clamp the live count to `cap`, dropping the oldest particles first.
    pub fn enforce_cap(&mut self, cap: usize) {
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    /// Advance all particles and prune the expired ones.
    pub fn tick(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.tick(dt));
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        for p in &self.particles {
            p.draw(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
