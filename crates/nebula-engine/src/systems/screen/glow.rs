//! Element glows: the sinusoidal pulse and the one-shot highlight.
//!
//! Both mutate a DOM element's box-shadow, which the engine cannot draw
//! itself, so they emit `UiCommand`s for the bridge to apply. The style set
//! by an effect is guaranteed a matching `ClearGlow` exactly once — on
//! natural expiry, on cancellation, and on anchor death alike. A dead anchor
//! completes the effect immediately instead of erroring.

use std::f32::consts::TAU;

use crate::api::types::{AnchorId, UiCommand};
use crate::core::stage::Stage;
use crate::systems::particles::Color;

/// Sinusoidal glow cycling on an element for a fixed total duration.
#[derive(Debug, Clone)]
pub struct GlowPulse {
    pub anchor: AnchorId,
    pub color: Color,
    pub duration: f32,
    generation: u32,
    elapsed: f32,
    cleared: bool,
}

impl GlowPulse {
    /// Length of one blur cycle within the total duration.
    pub const CYCLE: f32 = 0.5;

    pub fn new(anchor: AnchorId, generation: u32, color: Color, duration: f32) -> Self {
        GlowPulse {
            anchor,
            color,
            duration,
            generation,
            elapsed: 0.0,
            cleared: false,
        }
    }

    /// Shadow blur in pixels at the current cycle phase.
    pub fn blur(&self) -> f32 {
        let progress = (self.elapsed % Self::CYCLE) / Self::CYCLE;
        let intensity = (progress * TAU).sin() * 0.5 + 0.5;
        10.0 + intensity * 20.0
    }

    pub fn finished(&self) -> bool {
        self.cleared
    }

    /// Advance the pulse. Returns false once the glow has been cleared.
    pub fn tick(&mut self, dt: f32, stage: &Stage, commands: &mut Vec<UiCommand>) -> bool {
        if self.cleared {
            return false;
        }
        self.elapsed += dt;

        let stale = stage.generation(self.anchor) != Some(self.generation);
        if stale || self.elapsed >= self.duration {
            self.cancel(commands);
            return false;
        }

        commands.push(UiCommand::SetGlow {
            anchor: self.anchor,
            blur: self.blur(),
            color: self.color.to_css(),
        });
        true
    }

    /// Restore the element's style. Idempotent: the clear is emitted once.
    pub fn cancel(&mut self, commands: &mut Vec<UiCommand>) {
        if self.cleared {
            return;
        }
        self.cleared = true;
        commands.push(UiCommand::ClearGlow { anchor: self.anchor });
    }
}

/// One-shot element highlight: a fixed glow held for a duration.
#[derive(Debug, Clone)]
pub struct Glow {
    pub anchor: AnchorId,
    pub color: Color,
    pub duration: f32,
    generation: u32,
    elapsed: f32,
    cleared: bool,
}

impl Glow {
    pub const BLUR: f32 = 20.0;

    /// Create the glow and emit its `SetGlow` immediately.
    pub fn start(
        anchor: AnchorId,
        generation: u32,
        color: Color,
        duration: f32,
        commands: &mut Vec<UiCommand>,
    ) -> Self {
        commands.push(UiCommand::SetGlow {
            anchor,
            blur: Self::BLUR,
            color: color.to_css(),
        });
        Glow {
            anchor,
            color,
            duration,
            generation,
            elapsed: 0.0,
            cleared: false,
        }
    }

    pub fn finished(&self) -> bool {
        self.cleared
    }

    /// Advance. Returns false once the highlight has been cleared.
    pub fn tick(&mut self, dt: f32, stage: &Stage, commands: &mut Vec<UiCommand>) -> bool {
        if self.cleared {
            return false;
        }
        self.elapsed += dt;

        let stale = stage.generation(self.anchor) != Some(self.generation);
        if stale || self.elapsed >= self.duration {
            self.cancel(commands);
            return false;
        }
        true
    }

    pub fn cancel(&mut self, commands: &mut Vec<UiCommand>) {
        if self.cleared {
            return;
        }
        self.cleared = true;
        commands.push(UiCommand::ClearGlow { anchor: self.anchor });
    }
}
