//! A single simulated particle.

use glam::Vec2;

use crate::renderer::draw::FrameBuffer;
use super::color::Color;
use super::kind::{Motion, ParticleKind};
use super::rng::Rng;

/// Transient point mass with decaying life, rendered as a disc or star.
///
/// Kinematics are normalized to a 60 Hz reference frame: a 1/60 s tick
/// advances exactly one step of the original per-frame integration, and
/// other timesteps scale linearly.
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life; starts in the kind's life range, hits 0.0 exactly once.
    pub life: f32,
    pub size: f32,
    pub color: Color,
    pub sparkle: bool,
    decay: f32,
    gravity: f32,
    friction: f32,
    motion: Motion,
    spin: f32,
    spiral_rate: f32,
    spiral_phase: f32,
    rise_floor: f32,
}

impl Particle {
    pub fn spawn(kind: ParticleKind, origin: Vec2, rng: &mut Rng) -> Self {
        let profile = kind.profile();
        let color = kind.pick_color(rng);
        Particle {
            kind,
            pos: origin,
            vel: profile.velocity.sample(rng),
            life: rng.range(profile.life.0, profile.life.1).max(profile.life.0),
            size: rng.range(profile.size.0, profile.size.1).max(profile.size.0),
            color,
            sparkle: profile.sparkle_chance > 0.0 && rng.chance(profile.sparkle_chance),
            decay: profile.decay,
            gravity: profile.gravity,
            friction: profile.friction,
            motion: profile.motion,
            spin: 0.0,
            spiral_rate: rng.range(0.8, 2.5),
            spiral_phase: rng.range(0.0, std::f32::consts::TAU),
            rise_floor: origin.y - 100.0,
        }
    }

    /// Advance one step. Returns false when the particle has expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        let k = dt * 60.0;

        self.pos += self.vel * k;
        self.vel.y += self.gravity * k;
        let f = self.friction.powf(k);
        self.vel *= f;

        match self.motion {
            Motion::None => {}
            Motion::Spiral => {
                self.spiral_phase += self.spiral_rate * k;
                self.pos += Vec2::new(self.spiral_phase.cos(), self.spiral_phase.sin()) * 0.5 * k;
            }
            Motion::Rise => {
                if self.pos.y > self.rise_floor {
                    self.vel.y -= 0.05 * k;
                }
            }
        }

        if self.sparkle {
            self.spin += 0.16 * k;
        }

        self.life -= self.decay * k;
        if self.life <= 0.0 {
            self.life = 0.0;
            return false;
        }
        true
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        if self.life <= 0.0 {
            return;
        }
        let alpha = self.life.min(1.0);
        // Trail pips shrink as they fade instead of popping out.
        let radius = if self.kind == ParticleKind::Trail {
            self.size * self.life
        } else {
            self.size
        };
        if self.sparkle {
            frame.push_star(self.pos, radius, self.spin, self.color, alpha);
        } else {
            frame.push_circle(self.pos, radius, self.color, alpha);
        }
    }
}
