// Extensions — pure helpers decoupled from engine state.

pub mod easing;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
