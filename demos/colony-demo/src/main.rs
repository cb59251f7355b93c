//! Scripted colony-war scenario, run headlessly at 60 Hz.
//!
//! Stands in for the browser page: registers planet anchors, fires the same
//! events the game rules would, and logs what the effect registries and the
//! frame buffer are doing. Handy for eyeballing recipe volumes per quality
//! tier without a browser in the loop.

use glam::Vec2;
use nebula_engine::{
    resource_color, AnchorId, AnchorRect, BuildingKind, FxEngine, GameEvent, Quality,
    ResourceKind, SettingsPatch, ShipClass,
};

const DT: f32 = 1.0 / 60.0;

const HOMEWORLD: AnchorId = AnchorId(1);
const FRONTIER: AnchorId = AnchorId(2);
const ENEMY_KEEP: AnchorId = AnchorId(3);
const ENERGY_HUD: AnchorId = AnchorId(10);

fn main() {
    env_logger::init();

    let mut fx = FxEngine::new(0xC0_10_4E);
    register_planets(&mut fx);

    fx.update_settings(SettingsPatch {
        particle_quality: Some(Quality::High),
        ..Default::default()
    });

    // Turn 1: build up the homeworld and float the payout.
    log::info!("turn 1: construction");
    fx.building_constructed(HOMEWORLD, BuildingKind::Shipyard);
    fx.resource_gained(ENERGY_HUD, 120, ResourceKind::Energy);
    fx.float_text(ENERGY_HUD, "+120", resource_color(ResourceKind::Energy));
    run(&mut fx, 2.0);

    // Turn 2: a fleet launches and settles into orbit.
    log::info!("turn 2: fleet launch");
    let fleet = fx
        .launch_fleet(HOMEWORLD, ShipClass::Fighter, 3)
        .expect("homeworld anchor is registered");
    run(&mut fx, 1.5);
    fx.set_orbit_speed(fleet, true);
    run(&mut fx, 1.0);

    // Turn 3: the volley flies, beams and trails included.
    log::info!("turn 3: attack on the enemy keep");
    let committed = fx.attack(HOMEWORLD, ENEMY_KEEP);
    log::info!("{committed} ships committed to the volley");
    fx.battle_start(HOMEWORLD, ENEMY_KEEP);
    run(&mut fx, 4.5);

    // Turn 4: the keep falls; its card is re-rendered under new ownership,
    // which retires the orbiting defenders automatically.
    log::info!("turn 4: conquest");
    fx.handle_event(GameEvent::PlanetConquered { anchor: ENEMY_KEEP });
    fx.register_anchor(ENEMY_KEEP, AnchorRect::new(900.0, 300.0, 120.0, 120.0));
    run(&mut fx, 2.5);

    // Turn 5: research pays off, then the session winds down.
    log::info!("turn 5: research and wind-down");
    fx.tech_researched(FRONTIER);
    fx.explosion_at(Vec2::new(640.0, 360.0));
    fx.end_turn();
    run(&mut fx, 3.0);

    let stats = fx.stats();
    log::info!(
        "final: {} particles, {} effects, {} ships, {:.2} ms frame",
        stats.particle_count,
        stats.effect_count,
        fx.ship_count(),
        stats.frame_time_ms,
    );
}

fn register_planets(fx: &mut FxEngine) {
    fx.register_anchor(HOMEWORLD, AnchorRect::new(150.0, 300.0, 120.0, 120.0));
    fx.register_anchor(FRONTIER, AnchorRect::new(500.0, 150.0, 100.0, 100.0));
    fx.register_anchor(ENEMY_KEEP, AnchorRect::new(900.0, 300.0, 120.0, 120.0));
    fx.register_anchor(ENERGY_HUD, AnchorRect::new(20.0, 20.0, 160.0, 40.0));
}

fn run(fx: &mut FxEngine, seconds: f32) {
    let steps = (seconds / DT).round() as usize;
    for step in 0..steps {
        fx.tick(DT);
        fx.render();
        if step % 30 == 0 {
            let frame = fx.frame();
            log::debug!(
                "frame {:>4}: {} shapes, {} sprites, {} tones",
                step,
                frame.shape_count(),
                frame.sprite_count(),
                frame.tone_count(),
            );
        }
    }
}
