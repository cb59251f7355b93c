//! A single ship marker and its animation state machine.
//!
//! Ships never own their screen position: every tick re-derives it from the
//! orbit center handed in by the fleet, so the marker follows its planet
//! through layout changes for free.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::api::types::ShipClass;
use crate::extensions::easing::{ease_vec2, lerp, Easing};

/// Orbit distance from the anchor center, in CSS pixels.
pub const ORBIT_RADIUS: f32 = 40.0;
/// Orbit slots around a planet; slot angles are spaced evenly.
pub const ORBIT_SLOTS: usize = 5;
/// Orbit angular speed (radians per second).
pub const ORBIT_SPEED: f32 = 1.0;
pub const FAST_ORBIT_SPEED: f32 = 2.5;

pub const LAUNCH_DURATION: f32 = 1.0;
/// Flight time is distance over this speed, capped at [`MAX_FLIGHT`].
pub const FLIGHT_SPEED: f32 = 200.0;
pub const MAX_FLIGHT: f32 = 2.0;
/// The laser fires this far into the flight, or on arrival if sooner.
pub const BEAM_DELAY: f32 = 0.8;
/// Peak scale while attacking.
pub const ATTACK_SCALE: f32 = 1.2;
pub const HOLD_DURATION: f32 = 0.5;
pub const RETURN_DURATION: f32 = 1.0;
pub const REMOVE_DURATION: f32 = 0.5;

/// Trail pips laid down along the flight path.
pub const TRAIL_STEPS: u32 = 10;
pub const TRAIL_INTERVAL: f32 = 0.05;

/// Sub-effects a ship requests while animating. Collected per tick and
/// bridged into the particle/screen/audio registries by the fleet pass.
#[derive(Debug, Default)]
pub struct ShipEvents {
    /// Laser beams to fire, as (from, to) segments.
    pub beams: Vec<(Vec2, Vec2)>,
    /// Trail pip positions along flight paths.
    pub trails: Vec<Vec2>,
}

/// A straight-line attack run, frozen at command time.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    elapsed: f32,
    beam_at: f32,
    beam_fired: bool,
    trails_emitted: u32,
}

impl Flight {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        let duration = (from.distance(to) / FLIGHT_SPEED).min(MAX_FLIGHT);
        Flight {
            from,
            to,
            duration,
            elapsed: 0.0,
            beam_at: BEAM_DELAY.min(duration),
            beam_fired: false,
            trails_emitted: 0,
        }
    }

    fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShipPhase {
    /// Spawn animation before settling into orbit.
    Launching { remaining: f32 },
    Orbiting { fast: bool },
    /// Volley stagger: still orbiting, attack already committed.
    Staging { remaining: f32, target: Vec2 },
    Attacking(Flight),
    /// Brief stop at the target before turning home.
    Holding { remaining: f32 },
    Returning { from: Vec2, elapsed: f32 },
    /// Shrink/spin/fade, then the ship is purged.
    Removing { delay: f32, elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub class: ShipClass,
    pub slot: usize,
    pub phase: ShipPhase,
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    orbit_angle: f32,
}

impl Ship {
    pub fn new(class: ShipClass, slot: usize) -> Self {
        Ship {
            class,
            slot,
            phase: ShipPhase::Launching {
                remaining: LAUNCH_DURATION,
            },
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: 0.0,
            alpha: 0.0,
            orbit_angle: 0.0,
        }
    }

    /// Current slot angle around the orbit center.
    fn angle(&self) -> f32 {
        self.slot as f32 * TAU / ORBIT_SLOTS as f32 + self.orbit_angle
    }

    fn orbit_pos(&self, center: Vec2) -> Vec2 {
        let a = self.angle();
        center + Vec2::new(a.cos(), a.sin()) * ORBIT_RADIUS
    }

    /// Commit to an attack run after a volley stagger. Only an orbiting ship
    /// accepts the command; ships mid-flight or being removed ignore it.
    pub fn command_attack(&mut self, stagger: f32, target: Vec2) -> bool {
        match self.phase {
            ShipPhase::Orbiting { .. } => {
                self.phase = ShipPhase::Staging {
                    remaining: stagger,
                    target,
                };
                true
            }
            _ => false,
        }
    }

    /// Start the shrink/spin/fade-out. Idempotent.
    pub fn begin_removal(&mut self, delay: f32) {
        if !matches!(self.phase, ShipPhase::Removing { .. }) {
            self.phase = ShipPhase::Removing {
                delay,
                elapsed: 0.0,
            };
        }
    }

    pub fn set_fast_orbit(&mut self, fast: bool) {
        if let ShipPhase::Orbiting { fast: ref mut f } = self.phase {
            *f = fast;
        }
    }

    /// Advance one tick. Returns false once removal has played out.
    pub fn tick(&mut self, dt: f32, orbit_center: Vec2, events: &mut ShipEvents) -> bool {
        match &mut self.phase {
            ShipPhase::Launching { remaining } => {
                *remaining -= dt;
                let t = (1.0 - *remaining / LAUNCH_DURATION).clamp(0.0, 1.0);
                self.pos = self.orbit_pos(orbit_center);
                self.rotation = self.angle() + FRAC_PI_2;
                self.scale = Easing::QuadOut.apply(t);
                self.alpha = t;
                if t >= 1.0 {
                    self.phase = ShipPhase::Orbiting { fast: false };
                }
            }
            ShipPhase::Orbiting { fast } => {
                let speed = if *fast { FAST_ORBIT_SPEED } else { ORBIT_SPEED };
                self.orbit_angle += speed * dt;
                self.pos = self.orbit_pos(orbit_center);
                self.rotation = self.angle() + FRAC_PI_2;
                self.scale = 1.0;
                self.alpha = 1.0;
            }
            ShipPhase::Staging { remaining, target } => {
                *remaining -= dt;
                let target = *target;
                let launch = *remaining <= 0.0;
                self.orbit_angle += ORBIT_SPEED * dt;
                self.pos = self.orbit_pos(orbit_center);
                if launch {
                    self.phase = ShipPhase::Attacking(Flight::new(self.pos, target));
                }
            }
            ShipPhase::Attacking(flight) => {
                flight.elapsed += dt;
                let t = flight.progress();

                if !flight.beam_fired && flight.elapsed >= flight.beam_at {
                    flight.beam_fired = true;
                    events.beams.push((flight.from, flight.to));
                }
                while flight.trails_emitted < TRAIL_STEPS
                    && flight.elapsed >= flight.trails_emitted as f32 * TRAIL_INTERVAL
                {
                    let p = flight.trails_emitted as f32 / TRAIL_STEPS as f32;
                    events
                        .trails
                        .push(flight.from + (flight.to - flight.from) * p);
                    flight.trails_emitted += 1;
                }

                let heading = flight.to - flight.from;
                let arrived_at = flight.to;
                self.pos = ease_vec2(flight.from, flight.to, t, Easing::QuadInOut);
                self.scale = lerp(1.0, ATTACK_SCALE, t);
                if heading != Vec2::ZERO {
                    self.rotation = heading.y.atan2(heading.x) + FRAC_PI_2;
                }
                if t >= 1.0 {
                    self.pos = arrived_at;
                    self.phase = ShipPhase::Holding {
                        remaining: HOLD_DURATION,
                    };
                }
            }
            ShipPhase::Holding { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.phase = ShipPhase::Returning {
                        from: self.pos,
                        elapsed: 0.0,
                    };
                }
            }
            ShipPhase::Returning { from, elapsed } => {
                *elapsed += dt;
                let from = *from;
                let t = (*elapsed / RETURN_DURATION).min(1.0);
                let home = self.orbit_pos(orbit_center);
                self.pos = ease_vec2(from, home, t, Easing::QuadOut);
                self.scale = lerp(ATTACK_SCALE, 1.0, t);
                if t >= 1.0 {
                    self.phase = ShipPhase::Orbiting { fast: false };
                }
            }
            ShipPhase::Removing { delay, elapsed } => {
                if *delay > 0.0 {
                    *delay -= dt;
                } else {
                    *elapsed += dt;
                    let t = (*elapsed / REMOVE_DURATION).min(1.0);
                    self.scale = 1.0 - t;
                    self.alpha = 1.0 - t;
                    self.rotation += TAU * dt / REMOVE_DURATION;
                    if t >= 1.0 {
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const CENTER: Vec2 = Vec2::new(300.0, 300.0);

    fn run(ship: &mut Ship, seconds: f32, events: &mut ShipEvents) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            ship.tick(DT, CENTER, events);
        }
    }

    #[test]
    fn flight_duration_scales_with_distance() {
        let flight = Flight::new(Vec2::ZERO, Vec2::new(200.0, 0.0));
        assert!((flight.duration - 1.0).abs() < 1e-6);

        let flight = Flight::new(Vec2::ZERO, Vec2::new(300.0, 0.0));
        assert!((flight.duration - 1.5).abs() < 1e-6);
    }

    #[test]
    fn flight_duration_caps_at_two_seconds() {
        let flight = Flight::new(Vec2::ZERO, Vec2::new(1000.0, 0.0));
        assert!((flight.duration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn short_flight_fires_beam_on_arrival() {
        let flight = Flight::new(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!((flight.duration - 0.5).abs() < 1e-6);
        assert!((flight.beam_at - 0.5).abs() < 1e-6);
    }

    #[test]
    fn launch_settles_into_orbit() {
        let mut ship = Ship::new(ShipClass::Fighter, 0);
        let mut events = ShipEvents::default();

        run(&mut ship, 0.5, &mut events);
        assert!(matches!(ship.phase, ShipPhase::Launching { .. }));
        assert!(ship.scale > 0.0 && ship.scale < 1.0);

        run(&mut ship, 0.6, &mut events);
        assert!(matches!(ship.phase, ShipPhase::Orbiting { fast: false }));
        assert_eq!(ship.scale, 1.0);
        // Orbit distance holds.
        assert!((ship.pos.distance(CENTER) - ORBIT_RADIUS).abs() < 0.01);
    }

    #[test]
    fn attack_round_trip_returns_to_orbit() {
        let mut ship = Ship::new(ShipClass::Cruiser, 0);
        let mut events = ShipEvents::default();
        run(&mut ship, 1.1, &mut events);

        let target = Vec2::new(700.0, 300.0);
        assert!(ship.command_attack(0.1, target));
        assert!(matches!(ship.phase, ShipPhase::Staging { .. }));

        // Stagger 0.1 s + flight (distance ~360-440 px from orbit, < 2.2 s)
        // + hold 0.5 s + return 1 s, with slack.
        run(&mut ship, 0.2, &mut events);
        assert!(matches!(ship.phase, ShipPhase::Attacking(_)));

        run(&mut ship, 4.0, &mut events);
        assert!(matches!(ship.phase, ShipPhase::Orbiting { .. }));
        assert!((ship.pos.distance(CENTER) - ORBIT_RADIUS).abs() < 0.01);
        assert_eq!(events.beams.len(), 1);
    }

    #[test]
    fn attack_ignored_unless_orbiting() {
        let mut ship = Ship::new(ShipClass::Scout, 0);
        assert!(
            !ship.command_attack(0.0, Vec2::ZERO),
            "a launching ship must not take attack commands"
        );
    }

    #[test]
    fn beam_fires_exactly_once_at_delay() {
        let mut ship = Ship::new(ShipClass::Fighter, 0);
        let mut events = ShipEvents::default();
        run(&mut ship, 1.1, &mut events);

        // ~400 px flight, so duration ~2 s and the beam fires at 0.8 s.
        ship.command_attack(0.0, Vec2::new(CENTER.x + 440.0, CENTER.y));
        ship.tick(DT, CENTER, &mut events);
        assert!(matches!(ship.phase, ShipPhase::Attacking(_)));

        run(&mut ship, 0.7, &mut events);
        assert!(events.beams.is_empty());
        run(&mut ship, 0.2, &mut events);
        assert_eq!(events.beams.len(), 1);
        run(&mut ship, 1.5, &mut events);
        assert_eq!(events.beams.len(), 1);
    }

    #[test]
    fn trails_cover_the_flight_path() {
        let mut ship = Ship::new(ShipClass::Fighter, 0);
        let mut events = ShipEvents::default();
        run(&mut ship, 1.1, &mut events);

        ship.command_attack(0.0, Vec2::new(CENTER.x + 400.0, CENTER.y));
        run(&mut ship, 1.0, &mut events);
        assert_eq!(events.trails.len(), TRAIL_STEPS as usize);

        // Pips are evenly spaced from launch point toward the target.
        let first = events.trails[0];
        let last = events.trails[TRAIL_STEPS as usize - 1];
        assert!(last.x > first.x);
    }

    #[test]
    fn removal_shrinks_and_purges() {
        let mut ship = Ship::new(ShipClass::Battleship, 2);
        let mut events = ShipEvents::default();
        run(&mut ship, 1.1, &mut events);

        ship.begin_removal(0.1);
        assert!(ship.tick(DT, CENTER, &mut events)); // still in the delay

        let mut alive = true;
        for _ in 0..60 {
            alive = ship.tick(DT, CENTER, &mut events);
            if !alive {
                break;
            }
        }
        assert!(!alive);
        assert!(ship.scale <= 0.0 + 1e-6);
        assert!(ship.alpha <= 0.0 + 1e-6);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut ship = Ship::new(ShipClass::Scout, 0);
        ship.begin_removal(0.0);
        let ShipPhase::Removing { elapsed, .. } = &ship.phase else {
            panic!("expected removal");
        };
        let elapsed = *elapsed;
        let mut events = ShipEvents::default();
        ship.tick(DT, CENTER, &mut events);
        ship.begin_removal(0.0); // must not restart the animation
        if let ShipPhase::Removing {
            elapsed: after, ..
        } = ship.phase
        {
            assert!(after > elapsed);
        } else {
            panic!("expected removal");
        }
    }

    #[test]
    fn slots_spread_around_the_orbit() {
        let a = Ship::new(ShipClass::Fighter, 0);
        let b = Ship::new(ShipClass::Fighter, 1);
        let spacing = b.angle() - a.angle();
        assert!((spacing - TAU / 5.0).abs() < 1e-6);
    }
}
