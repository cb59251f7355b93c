//! Fleet registry: volleys, staggering, anchor tracking, purge.

mod ship;

pub use ship::{
    Flight, Ship, ShipEvents, ShipPhase, ATTACK_SCALE, BEAM_DELAY, FAST_ORBIT_SPEED,
    FLIGHT_SPEED, HOLD_DURATION, LAUNCH_DURATION, MAX_FLIGHT, ORBIT_RADIUS, ORBIT_SLOTS,
    ORBIT_SPEED, REMOVE_DURATION, RETURN_DURATION, TRAIL_INTERVAL, TRAIL_STEPS,
};

use glam::Vec2;

use crate::api::types::{AnchorId, FleetId, ShipClass};
use crate::core::stage::Stage;
use crate::renderer::draw::{FrameBuffer, SpriteInstance};
use crate::systems::audio::AudioState;
use crate::systems::particles::{ParticleKind, ParticleState};
use crate::systems::screen::ScreenState;

/// Delay between ships of one fleet joining a volley.
pub const SHIP_STAGGER: f32 = 0.1;
/// Delay between fleets of one planet joining a volley.
pub const FLEET_STAGGER: f32 = 0.2;
/// Delay between ships starting their removal animation.
pub const REMOVE_STAGGER: f32 = 0.1;

/// Up to five markers orbiting one planet anchor.
pub struct Fleet {
    pub id: FleetId,
    pub anchor: AnchorId,
    pub class: ShipClass,
    pub ships: Vec<Ship>,
    generation: u32,
    /// Anchor center from the last tick it was alive. Removal animations
    /// keep playing around this point after the anchor dies.
    last_center: Vec2,
}

impl Fleet {
    fn begin_removal(&mut self) {
        for (i, ship) in self.ships.iter_mut().enumerate() {
            ship.begin_removal(i as f32 * REMOVE_STAGGER);
        }
    }
}

pub struct FleetState {
    fleets: Vec<Fleet>,
    next_id: u32,
}

impl Default for FleetState {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetState {
    pub fn new() -> Self {
        FleetState {
            fleets: Vec::new(),
            // Fleet ids start at 1; the bridge reports 0 for a failed launch.
            next_id: 1,
        }
    }

    /// Spawn a fleet of 1-5 ships around a planet anchor. A missing anchor
    /// yields `None` and nothing is spawned.
    pub fn launch(
        &mut self,
        anchor: AnchorId,
        class: ShipClass,
        fleet_size: usize,
        stage: &Stage,
    ) -> Option<FleetId> {
        let registered = stage.get(anchor)?;
        let id = FleetId(self.next_id);
        self.next_id += 1;
        let ships = (0..fleet_size.clamp(1, ORBIT_SLOTS))
            .map(|slot| Ship::new(class, slot))
            .collect();
        self.fleets.push(Fleet {
            id,
            anchor,
            class,
            ships,
            generation: registered.generation,
            last_center: registered.rect.center(),
        });
        Some(id)
    }

    /// Command one fleet to attack the target point, ships staggered so the
    /// run reads as a volley. Returns the number of ships committed.
    pub fn attack(&mut self, fleet: FleetId, target: Vec2, base_delay: f32) -> usize {
        let Some(fleet) = self.fleets.iter_mut().find(|f| f.id == fleet) else {
            return 0;
        };
        let mut committed = 0;
        for (i, ship) in fleet.ships.iter_mut().enumerate() {
            if ship.command_attack(base_delay + i as f32 * SHIP_STAGGER, target) {
                committed += 1;
            }
        }
        committed
    }

    /// Send every fleet orbiting `from` against the target anchor, fleets
    /// staggered [`FLEET_STAGGER`] apart. The target position is frozen at
    /// command time. Returns the number of ships committed.
    pub fn attack_from(&mut self, from: AnchorId, target: AnchorId, stage: &Stage) -> usize {
        let Some(target_pos) = stage.center(target) else {
            return 0;
        };
        let ids: Vec<FleetId> = self
            .fleets
            .iter()
            .filter(|f| f.anchor == from)
            .map(|f| f.id)
            .collect();
        ids.iter()
            .enumerate()
            .map(|(i, &id)| self.attack(id, target_pos, i as f32 * FLEET_STAGGER))
            .sum()
    }

    /// Play the shrink/spin/fade-out; the fleet is purged once every ship
    /// has finished.
    pub fn remove(&mut self, fleet: FleetId) {
        if let Some(fleet) = self.fleets.iter_mut().find(|f| f.id == fleet) {
            fleet.begin_removal();
        }
    }

    pub fn set_orbit_speed(&mut self, fleet: FleetId, fast: bool) {
        if let Some(fleet) = self.fleets.iter_mut().find(|f| f.id == fleet) {
            for ship in &mut fleet.ships {
                ship.set_fast_orbit(fast);
            }
        }
    }

    /// Advance every ship. Fleets whose anchor died or was replaced start
    /// their removal automatically; fully played-out fleets are purged.
    pub fn tick(&mut self, dt: f32, stage: &Stage) -> ShipEvents {
        let mut events = ShipEvents::default();
        for fleet in &mut self.fleets {
            match stage.center_at_generation(fleet.anchor, fleet.generation) {
                Some(center) => fleet.last_center = center,
                None => fleet.begin_removal(),
            }
            let center = fleet.last_center;
            fleet.ships.retain_mut(|ship| ship.tick(dt, center, &mut events));
        }
        self.fleets.retain(|f| !f.ships.is_empty());
        events
    }

    pub fn draw(&self, frame: &mut FrameBuffer) {
        for fleet in &self.fleets {
            for ship in &fleet.ships {
                frame.push_sprite(SpriteInstance {
                    x: ship.pos.x,
                    y: ship.pos.y,
                    rotation: ship.rotation,
                    scale: ship.scale,
                    sprite: ship.class.sprite_index() as f32,
                    alpha: ship.alpha,
                    pad0: 0.0,
                    pad1: 0.0,
                });
            }
        }
    }

    pub fn get(&self, fleet: FleetId) -> Option<&Fleet> {
        self.fleets.iter().find(|f| f.id == fleet)
    }

    pub fn fleet_count(&self) -> usize {
        self.fleets.len()
    }

    pub fn ship_count(&self) -> usize {
        self.fleets.iter().map(|f| f.ships.len()).sum()
    }

    /// Drop everything immediately, skipping the removal animation.
    pub fn clear(&mut self) {
        self.fleets.clear();
    }
}

/// Advance fleets and bridge their sub-effects into the shared registries:
/// beams become laser screen effects plus a laser tone, trail pips become
/// particles. A free function so the registries borrow independently.
pub fn tick_fleets(
    fleets: &mut FleetState,
    stage: &Stage,
    dt: f32,
    particles: &mut ParticleState,
    screen: &mut ScreenState,
    audio: &mut AudioState,
) {
    let events = fleets.tick(dt, stage);
    for (from, to) in events.beams {
        screen.laser(from, to);
        audio.play_laser();
    }
    for pos in events.trails {
        particles.spawn(ParticleKind::Trail, pos, 1);
    }
}
