pub mod api;
pub mod core;
pub mod extensions;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::engine::FxEngine;
pub use api::settings::{Quality, Settings, SettingsPatch};
pub use api::types::{
    AnchorId, BuildingKind, FleetId, GameEvent, PerfStats, ResourceKind, ShipClass, UiCommand,
};
pub use core::clock::{FixedTimestep, FrameClock};
pub use core::stage::{Anchor, AnchorRect, Stage, Viewport};
pub use renderer::draw::{
    FrameBuffer, FxLayout, ShapeKind, ShapeRecord, SpriteInstance, ToneRecord, HEADER_FLOATS,
    SHAPE_FLOATS, SPRITE_FLOATS, TONE_FLOATS,
};
pub use systems::audio::{AudioState, Tone, Waveform};
pub use systems::particles::{
    building_color, resource_color, Color, Particle, ParticleKind, ParticleState, Rng,
};
pub use systems::screen::{ConquestRing, Flash, Glow, GlowPulse, LaserBeam, ScreenShake, ScreenState};
pub use systems::ships::{Fleet, FleetState, Ship, ShipEvents, ShipPhase};

// Extensions — decoupled pure helpers
pub use extensions::{ease, ease_vec2, lerp, lerp_vec2, Easing};
