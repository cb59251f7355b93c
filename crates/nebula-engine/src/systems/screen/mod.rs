//! Screen-effect registry.
//!
//! One Vec per effect type, all advanced by a single pass. The registry is
//! also the sole writer of the viewport shake offset and the producer of the
//! per-frame `UiCommand` queue the bridge drains.

mod flash;
mod glow;
mod laser;
mod ring;
mod shake;

pub use flash::Flash;
pub use glow::{Glow, GlowPulse};
pub use laser::LaserBeam;
pub use ring::ConquestRing;
pub use shake::ScreenShake;

use glam::Vec2;

use crate::api::types::{AnchorId, UiCommand};
use crate::core::stage::{Stage, Viewport};
use crate::renderer::draw::FrameBuffer;
use crate::systems::particles::{Color, Rng};

#[derive(Default)]
pub struct ScreenState {
    flashes: Vec<Flash>,
    lasers: Vec<LaserBeam>,
    shakes: Vec<ScreenShake>,
    pulses: Vec<GlowPulse>,
    glows: Vec<Glow>,
    rings: Vec<ConquestRing>,
    viewport: Viewport,
    commands: Vec<UiCommand>,
    /// Latch: true while a shake is writing the viewport. Guarantees the
    /// zero-offset restore happens exactly once when the last shake ends.
    shake_live: bool,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Triggers --

    pub fn flash(&mut self, pos: Vec2, color: Color, intensity: f32) {
        self.flashes.push(Flash::new(pos, color, intensity));
    }

    pub fn laser(&mut self, from: Vec2, to: Vec2) {
        self.lasers.push(LaserBeam::new(from, to));
    }

    pub fn shake(&mut self, duration: f32, intensity: f32) {
        self.shakes.push(ScreenShake::new(duration, intensity));
    }

    pub fn ring(&mut self, pos: Vec2) {
        self.rings.push(ConquestRing::new(pos));
    }

    pub fn ring_sized(&mut self, pos: Vec2, max_radius: f32, duration: f32) {
        self.rings.push(ConquestRing::with_size(pos, max_radius, duration));
    }

    /// Start a pulse on an anchored element. A missing anchor is a no-op.
    pub fn pulse(&mut self, anchor: AnchorId, stage: &Stage, color: Color, duration: f32) {
        if let Some(generation) = stage.generation(anchor) {
            self.pulses
                .push(GlowPulse::new(anchor, generation, color, duration));
        }
    }

    /// Start a one-shot highlight on an anchored element.
    pub fn glow(&mut self, anchor: AnchorId, stage: &Stage, color: Color, duration: f32) {
        if let Some(generation) = stage.generation(anchor) {
            self.glows.push(Glow::start(
                anchor,
                generation,
                color,
                duration,
                &mut self.commands,
            ));
        }
    }

    /// Floating score text rising from a point. Animated browser-side, so it
    /// is a fire-and-forget command rather than a live effect.
    pub fn float_text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(UiCommand::FloatText {
            x: pos.x,
            y: pos.y,
            text: text.to_string(),
            color: color.to_css(),
        });
    }

    // -- Per-frame pass --

    pub fn tick(&mut self, dt: f32, stage: &Stage, rng: &mut Rng) {
        self.flashes.retain_mut(|f| f.tick(dt));
        self.lasers.retain_mut(|l| l.tick(dt));
        self.rings.retain_mut(|r| r.tick(dt));

        let commands = &mut self.commands;
        self.pulses.retain_mut(|p| p.tick(dt, stage, commands));
        self.glows.retain_mut(|g| g.tick(dt, stage, commands));

        self.shakes.retain_mut(|s| s.tick(dt));
        let amplitude = self
            .shakes
            .iter()
            .map(|s| s.amplitude())
            .fold(0.0_f32, f32::max);
        if amplitude > 0.0 {
            self.viewport.set_offset(Vec2::new(
                rng.range(-amplitude, amplitude),
                rng.range(-amplitude, amplitude),
            ));
            self.shake_live = true;
        } else if self.shake_live {
            self.viewport.set_offset(Vec2::ZERO);
            self.shake_live = false;
        }
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        for flash in &self.flashes {
            flash.draw(frame);
        }
        for laser in &self.lasers {
            laser.draw(frame);
        }
        for ring in &self.rings {
            ring.draw(frame);
        }
    }

    // -- Cancellation (settings changes, teardown) --

    /// Stop all shakes and restore the viewport to identity once.
    pub fn cancel_shakes(&mut self) {
        self.shakes.clear();
        if self.shake_live {
            self.viewport.set_offset(Vec2::ZERO);
            self.shake_live = false;
        }
    }

    /// Stop all element glows, emitting each pending clear exactly once.
    pub fn cancel_glows(&mut self) {
        let commands = &mut self.commands;
        for pulse in &mut self.pulses {
            pulse.cancel(commands);
        }
        for glow in &mut self.glows {
            glow.cancel(commands);
        }
        self.pulses.clear();
        self.glows.clear();
    }

    /// Drop every live effect, honoring the restore guarantees.
    pub fn clear(&mut self) {
        self.flashes.clear();
        self.lasers.clear();
        self.rings.clear();
        self.cancel_shakes();
        self.cancel_glows();
    }

    // -- Accessors --

    pub fn viewport_offset(&self) -> Vec2 {
        self.viewport.offset()
    }

    pub fn effect_count(&self) -> usize {
        self.flashes.len()
            + self.lasers.len()
            + self.shakes.len()
            + self.pulses.len()
            + self.glows.len()
            + self.rings.len()
    }

    pub fn drain_commands(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stage::AnchorRect;

    fn stage_with_anchor(id: u32) -> Stage {
        let mut stage = Stage::new();
        stage.register(AnchorId(id), AnchorRect::new(0.0, 0.0, 100.0, 100.0));
        stage
    }

    #[test]
    fn finished_effects_are_removed() {
        let mut screen = ScreenState::new();
        let stage = Stage::new();
        let mut rng = Rng::new(9);

        screen.flash(Vec2::ZERO, Color::GOLD, 0.5);
        screen.laser(Vec2::ZERO, Vec2::new(10.0, 0.0));
        screen.ring(Vec2::ZERO);
        assert_eq!(screen.effect_count(), 3);

        // Longest lifetime in the set is the 2 s ring.
        for _ in 0..130 {
            screen.tick(1.0 / 60.0, &stage, &mut rng);
        }
        assert_eq!(screen.effect_count(), 0);
    }

    #[test]
    fn shake_writes_viewport_and_restores_once() {
        let mut screen = ScreenState::new();
        let stage = Stage::new();
        let mut rng = Rng::new(9);

        screen.shake(0.3, 5.0);
        screen.tick(1.0 / 60.0, &stage, &mut rng);
        assert_ne!(screen.viewport_offset(), Vec2::ZERO);

        for _ in 0..30 {
            screen.tick(1.0 / 60.0, &stage, &mut rng);
        }
        assert_eq!(screen.viewport_offset(), Vec2::ZERO);
        assert_eq!(screen.effect_count(), 0);
    }

    #[test]
    fn cancel_shakes_restores_viewport() {
        let mut screen = ScreenState::new();
        let stage = Stage::new();
        let mut rng = Rng::new(9);

        screen.shake(10.0, 8.0);
        screen.tick(1.0 / 60.0, &stage, &mut rng);
        assert_ne!(screen.viewport_offset(), Vec2::ZERO);

        screen.cancel_shakes();
        assert_eq!(screen.viewport_offset(), Vec2::ZERO);
        assert_eq!(screen.effect_count(), 0);
    }

    #[test]
    fn cancel_glows_clears_each_exactly_once() {
        let stage = stage_with_anchor(1);
        let mut screen = ScreenState::new();
        let mut rng = Rng::new(9);

        screen.pulse(AnchorId(1), &stage, Color::GREEN, 5.0);
        screen.glow(AnchorId(1), &stage, Color::GOLD, 5.0);
        screen.tick(1.0 / 60.0, &stage, &mut rng);

        screen.cancel_glows();
        screen.cancel_glows();

        let clears = screen
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, UiCommand::ClearGlow { .. }))
            .count();
        assert_eq!(clears, 2);
    }

    #[test]
    fn pulse_on_missing_anchor_is_noop() {
        let stage = Stage::new();
        let mut screen = ScreenState::new();
        screen.pulse(AnchorId(7), &stage, Color::GREEN, 1.0);
        screen.glow(AnchorId(7), &stage, Color::GREEN, 1.0);
        assert_eq!(screen.effect_count(), 0);
        assert!(screen.drain_commands().is_empty());
    }

    #[test]
    fn float_text_is_a_single_command() {
        let mut screen = ScreenState::new();
        screen.float_text(Vec2::new(10.0, 20.0), "+50", Color::GOLD);
        let commands = screen.drain_commands();
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            &commands[0],
            UiCommand::FloatText { text, .. } if text == "+50"
        ));
        assert!(screen.drain_commands().is_empty());
    }

    #[test]
    fn draw_emits_only_canvas_effects() {
        let stage = stage_with_anchor(1);
        let mut screen = ScreenState::new();
        let mut rng = Rng::new(1);
        let mut frame = FrameBuffer::new(crate::renderer::draw::FxLayout::default());

        screen.flash(Vec2::ZERO, Color::GOLD, 0.5);
        screen.shake(0.3, 5.0);
        screen.pulse(AnchorId(1), &stage, Color::GREEN, 1.0);
        screen.tick(1.0 / 60.0, &stage, &mut rng);

        frame.begin_frame(screen.viewport_offset());
        screen.draw(&mut frame);
        // The shake lives in the header and the pulse in the command queue;
        // only the flash reaches the shape section.
        assert_eq!(frame.shape_count(), 1);
    }
}
