//! Per-kind particle behavior as data.
//!
//! One `Particle` record plus this table replaces a class-per-kind hierarchy:
//! each kind maps to a profile (velocity distribution, life/decay/gravity,
//! palette rule, motion modifier, draw style) and nothing else varies.

use glam::Vec2;

use crate::api::types::{BuildingKind, ResourceKind};
use super::color::Color;
use super::rng::Rng;

/// What a particle was spawned for. Selects its profile and palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    Construction(BuildingKind),
    ShipBuild,
    Explosion { battle: bool },
    Victory,
    Tech,
    Resource(ResourceKind),
    Trail,
}

/// Initial velocity distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityDist {
    /// Uniform in a centered square, `half` units per axis.
    Square { half: f32 },
    /// Uniform direction, speed uniform in the given range.
    Disc { speed: (f32, f32) },
    /// Horizontal spread with an upward-biased vertical range (fountains).
    Cone { half_vx: f32, vy: (f32, f32) },
    /// No initial motion (trail pips).
    Still,
}

impl VelocityDist {
    pub fn sample(&self, rng: &mut Rng) -> Vec2 {
        match *self {
            VelocityDist::Square { half } => {
                Vec2::new(rng.range(-half, half), rng.range(-half, half))
            }
            VelocityDist::Disc { speed } => {
                let angle = rng.range(0.0, std::f32::consts::TAU);
                let mag = rng.range(speed.0, speed.1);
                Vec2::new(angle.cos() * mag, angle.sin() * mag)
            }
            VelocityDist::Cone { half_vx, vy } => {
                Vec2::new(rng.range(-half_vx, half_vx), rng.range(vy.0, vy.1))
            }
            VelocityDist::Still => Vec2::ZERO,
        }
    }
}

/// Secondary motion applied on top of the ballistic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    None,
    /// Circular drift with a per-particle phase rate (tech particles).
    Spiral,
    /// Extra upward acceleration until the particle clears its rise floor
    /// (resource particles drifting toward the HUD).
    Rise,
}

/// Everything kind-specific about a particle's simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub velocity: VelocityDist,
    pub size: (f32, f32),
    pub life: (f32, f32),
    pub decay: f32,
    pub gravity: f32,
    pub friction: f32,
    pub motion: Motion,
    /// Probability of drawing as a rotating star instead of a disc.
    pub sparkle_chance: f32,
}

impl ParticleKind {
    pub fn profile(&self) -> KindProfile {
        match self {
            ParticleKind::Construction(_) => KindProfile {
                velocity: VelocityDist::Square { half: 2.0 },
                size: (1.0, 4.0),
                life: (0.5, 1.0),
                decay: 0.015,
                gravity: 0.1,
                friction: 0.98,
                motion: Motion::None,
                sparkle_chance: 0.0,
            },
            ParticleKind::ShipBuild => KindProfile {
                velocity: VelocityDist::Square { half: 3.0 },
                size: (1.0, 3.0),
                life: (0.4, 1.2),
                decay: 0.02,
                gravity: 0.0,
                friction: 0.98,
                motion: Motion::None,
                sparkle_chance: 0.0,
            },
            ParticleKind::Explosion { .. } => KindProfile {
                velocity: VelocityDist::Disc { speed: (2.0, 10.0) },
                size: (2.0, 6.0),
                life: (0.4, 1.0),
                decay: 0.025,
                gravity: 0.2,
                friction: 0.98,
                motion: Motion::None,
                sparkle_chance: 0.0,
            },
            ParticleKind::Victory => KindProfile {
                velocity: VelocityDist::Cone {
                    half_vx: 4.0,
                    vy: (-10.0, -2.0),
                },
                size: (2.0, 5.0),
                life: (0.6, 1.4),
                decay: 0.012,
                gravity: 0.15,
                friction: 0.98,
                motion: Motion::None,
                sparkle_chance: 0.3,
            },
            ParticleKind::Tech => KindProfile {
                velocity: VelocityDist::Disc { speed: (1.0, 4.0) },
                size: (1.0, 3.0),
                life: (0.5, 1.4),
                decay: 0.01,
                gravity: 0.0,
                friction: 0.98,
                motion: Motion::Spiral,
                sparkle_chance: 0.0,
            },
            ParticleKind::Resource(_) => KindProfile {
                velocity: VelocityDist::Cone {
                    half_vx: 2.0,
                    vy: (-8.0, -2.0),
                },
                size: (1.0, 3.0),
                life: (0.5, 1.2),
                decay: 0.015,
                gravity: 0.1,
                friction: 0.98,
                motion: Motion::Rise,
                sparkle_chance: 0.0,
            },
            ParticleKind::Trail => KindProfile {
                velocity: VelocityDist::Still,
                size: (3.0, 3.0),
                life: (1.0, 1.0),
                decay: 0.05,
                gravity: 0.0,
                friction: 1.0,
                motion: Motion::None,
                sparkle_chance: 0.0,
            },
        }
    }

    /// Pick a tint for one particle of this kind.
    pub fn pick_color(&self, rng: &mut Rng) -> Color {
        match self {
            ParticleKind::Construction(building) => building_color(*building),
            ParticleKind::ShipBuild => {
                Color::from_hsl(rng.range(200.0, 240.0), 1.0, rng.range(0.5, 0.8))
            }
            ParticleKind::Explosion { battle: true } => {
                Color::from_hsl(rng.range(0.0, 60.0), 1.0, rng.range(0.6, 0.8))
            }
            ParticleKind::Explosion { battle: false } => {
                Color::from_hsl(rng.range(10.0, 40.0), 1.0, rng.range(0.5, 0.8))
            }
            ParticleKind::Victory => {
                Color::from_hsl(rng.range(45.0, 75.0), 1.0, rng.range(0.6, 0.8))
            }
            ParticleKind::Tech => {
                Color::from_hsl(rng.range(280.0, 320.0), 1.0, rng.range(0.6, 0.8))
            }
            ParticleKind::Resource(resource) => resource_color(*resource),
            ParticleKind::Trail => Color::TRAIL_BLUE,
        }
    }
}

/// Construction-particle tint per building category.
pub fn building_color(kind: BuildingKind) -> Color {
    match kind {
        BuildingKind::PowerPlant => Color::GOLD,
        BuildingKind::ResearchLab => Color::PURPLE,
        BuildingKind::MiningFacility => Color::BROWN,
        BuildingKind::Habitat => Color::GREEN,
        BuildingKind::Shipyard => Color::BLUE,
        BuildingKind::DefenseSystem => Color::RED,
        BuildingKind::Other => Color::GREEN,
    }
}

/// Resource tint for gain bursts and floating text.
pub fn resource_color(kind: ResourceKind) -> Color {
    match kind {
        ResourceKind::Energy => Color::GOLD,
        ResourceKind::Research => Color::PURPLE,
        ResourceKind::Materials => Color::BROWN,
        ResourceKind::Population => Color::GREEN,
        ResourceKind::Other => Color::WHITE,
    }
}
