//! Laser beam: a glowing stroked segment with a short fixed fade.

use glam::Vec2;

use crate::renderer::draw::FrameBuffer;
use crate::systems::particles::Color;

#[derive(Debug, Clone)]
pub struct LaserBeam {
    pub from: Vec2,
    pub to: Vec2,
    elapsed: f32,
}

impl LaserBeam {
    pub const DURATION: f32 = 0.3;
    pub const WIDTH: f32 = 3.0;
    pub const BLUR: f32 = 10.0;
    pub const COLOR: Color = Color::CYAN;

    pub fn new(from: Vec2, to: Vec2) -> Self {
        LaserBeam {
            from,
            to,
            elapsed: 0.0,
        }
    }

    /// Advance. Returns false once the beam has faded out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        !self.finished()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= Self::DURATION
    }

    pub fn life(&self) -> f32 {
        (1.0 - self.elapsed / Self::DURATION).max(0.0)
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        if self.finished() {
            return;
        }
        frame.push_line(
            self.from,
            self.to,
            Self::WIDTH,
            Self::BLUR,
            Self::COLOR,
            self.life(),
        );
    }
}
