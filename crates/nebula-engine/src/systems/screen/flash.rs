//! Radial flash: a gradient burst that grows while it fades.

use glam::Vec2;

use crate::renderer::draw::FrameBuffer;
use crate::systems::particles::Color;

#[derive(Debug, Clone)]
pub struct Flash {
    pub pos: Vec2,
    pub color: Color,
    pub intensity: f32,
    elapsed: f32,
}

impl Flash {
    pub const DURATION: f32 = 0.4;
    pub const MAX_RADIUS: f32 = 150.0;

    pub fn new(pos: Vec2, color: Color, intensity: f32) -> Self {
        Flash {
            pos,
            color,
            intensity,
            elapsed: 0.0,
        }
    }

    /// Advance. Returns false once the flash has burned out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        !self.finished()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= Self::DURATION
    }

    /// Remaining opacity fraction, 1.0 → 0.0.
    pub fn life(&self) -> f32 {
        (1.0 - self.elapsed / Self::DURATION).max(0.0)
    }

    pub fn radius(&self) -> f32 {
        Self::MAX_RADIUS * (self.elapsed / Self::DURATION).min(1.0)
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        if self.finished() {
            return;
        }
        frame.push_glow(self.pos, self.radius(), self.color, self.life() * self.intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_linearly() {
        let mut flash = Flash::new(Vec2::ZERO, Color::GREEN, 0.3);
        flash.tick(0.2); // halfway
        assert!((flash.radius() - 75.0).abs() < 0.01);
        assert!((flash.life() - 0.5).abs() < 0.01);
    }

    #[test]
    fn finishes_at_duration() {
        let mut flash = Flash::new(Vec2::ZERO, Color::GOLD, 0.6);
        assert!(flash.tick(0.39));
        assert!(!flash.finished());
        assert!(!flash.tick(0.02));
        assert!(flash.finished());
        assert_eq!(flash.life(), 0.0);
    }
}
