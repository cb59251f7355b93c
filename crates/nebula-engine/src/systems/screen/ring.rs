//! Conquest ring: two concentric expanding circles.

use glam::Vec2;

use crate::renderer::draw::FrameBuffer;
use crate::systems::particles::Color;

/// Expanding double ring, gold outside and white inside. The conquest
/// celebration uses the defaults; free-position detonations reuse the same
/// effect at a smaller radius and faster expansion.
#[derive(Debug, Clone)]
pub struct ConquestRing {
    pub pos: Vec2,
    pub max_radius: f32,
    pub duration: f32,
    elapsed: f32,
}

impl ConquestRing {
    pub const DEFAULT_RADIUS: f32 = 200.0;
    pub const DEFAULT_DURATION: f32 = 2.0;
    /// Inner ring radius as a fraction of the outer.
    pub const INNER_SCALE: f32 = 0.8;

    pub fn new(pos: Vec2) -> Self {
        Self::with_size(pos, Self::DEFAULT_RADIUS, Self::DEFAULT_DURATION)
    }

    pub fn with_size(pos: Vec2, max_radius: f32, duration: f32) -> Self {
        ConquestRing {
            pos,
            max_radius,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance. Returns false once fully expanded.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        !self.finished()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn life(&self) -> f32 {
        (1.0 - self.elapsed / self.duration).max(0.0)
    }

    pub fn radius(&self) -> f32 {
        self.max_radius * (self.elapsed / self.duration).min(1.0)
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        if self.finished() {
            return;
        }
        let radius = self.radius();
        frame.push_ring(self.pos, radius, 3.0, 15.0, Color::GOLD, self.life());
        frame.push_ring(
            self.pos,
            radius * Self::INNER_SCALE,
            1.0,
            5.0,
            Color::WHITE,
            self.life() * 0.5,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw::{FxLayout, ShapeKind};

    #[test]
    fn expands_while_fading() {
        let mut ring = ConquestRing::new(Vec2::ZERO);
        ring.tick(1.0); // halfway through the 2 s expansion
        assert!((ring.radius() - 100.0).abs() < 0.01);
        assert!((ring.life() - 0.5).abs() < 0.01);
    }

    #[test]
    fn finishes_after_duration() {
        let mut ring = ConquestRing::new(Vec2::ZERO);
        assert!(ring.tick(1.9));
        assert!(!ring.tick(0.2));
        assert!(ring.finished());
        assert_eq!(ring.life(), 0.0);
    }

    #[test]
    fn draws_two_concentric_rings() {
        let mut frame = FrameBuffer::new(FxLayout::default());
        frame.begin_frame(Vec2::ZERO);

        let mut ring = ConquestRing::new(Vec2::new(50.0, 50.0));
        ring.tick(1.0);
        ring.draw(&mut frame);

        assert_eq!(frame.shape_count(), 2);
        let floats = frame.shapes();
        assert_eq!(floats[0], ShapeKind::Ring as u8 as f32);
        // Inner ring at 0.8 of the outer radius.
        let outer = floats[3];
        let inner = floats[12 + 3];
        assert!((inner - outer * 0.8).abs() < 0.01);
    }

    #[test]
    fn custom_size_scales_expansion() {
        let mut ring = ConquestRing::with_size(Vec2::ZERO, 150.0, 0.5);
        ring.tick(0.25);
        assert!((ring.radius() - 75.0).abs() < 0.01);
    }
}
