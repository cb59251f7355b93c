//! The effects engine facade.
//!
//! One semantic trigger per game event category, one registry per effect
//! family, one tick, one frame. This is the single entry point the page
//! talks to; everything the four original managers did routes through here.

use glam::Vec2;

use crate::api::settings::{Settings, SettingsPatch};
use crate::api::types::{
    AnchorId, BuildingKind, FleetId, GameEvent, PerfStats, ResourceKind, ShipClass, UiCommand,
};
use crate::core::clock::FrameClock;
use crate::core::stage::{AnchorRect, Stage};
use crate::renderer::draw::{FrameBuffer, FxLayout};
use crate::systems::audio::AudioState;
use crate::systems::particles::{Color, ParticleKind, ParticleState};
use crate::systems::screen::ScreenState;
use crate::systems::ships::{tick_fleets, FleetState};

pub struct FxEngine {
    clock: FrameClock,
    stage: Stage,
    particles: ParticleState,
    screen: ScreenState,
    fleets: FleetState,
    audio: AudioState,
    settings: Settings,
    frame: FrameBuffer,
}

impl FxEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_layout(seed, FxLayout::default())
    }

    pub fn with_layout(seed: u64, layout: FxLayout) -> Self {
        FxEngine {
            clock: FrameClock::new(),
            stage: Stage::new(),
            particles: ParticleState::new(seed),
            screen: ScreenState::new(),
            fleets: FleetState::new(),
            audio: AudioState::new(),
            settings: Settings::default(),
            frame: FrameBuffer::new(layout),
        }
    }

    // -- Anchors --

    pub fn register_anchor(&mut self, id: AnchorId, rect: AnchorRect) {
        self.stage.register(id, rect);
    }

    pub fn update_anchor(&mut self, id: AnchorId, rect: AnchorRect) {
        self.stage.update_rect(id, rect);
    }

    /// Forget an anchor. Fleets orbiting it play their removal on the next
    /// tick; live glows on it complete immediately.
    pub fn remove_anchor(&mut self, id: AnchorId) {
        self.stage.remove(id);
    }

    // -- Semantic triggers --

    pub fn building_constructed(&mut self, anchor: AnchorId, building: BuildingKind) {
        let Some(center) = self.stage.center(anchor) else {
            return;
        };
        self.spawn_scaled(ParticleKind::Construction(building), center, 30);
        if self.settings.enable_screen_effects {
            self.screen.flash(center, Color::GREEN, 0.3);
        }
        if self.settings.enable_ui_animations {
            self.screen.pulse(anchor, &self.stage, Color::GREEN, 1.0);
        }
        self.audio.play_build();
    }

    pub fn ship_built(&mut self, anchor: AnchorId) {
        let Some(center) = self.stage.center(anchor) else {
            return;
        };
        self.spawn_scaled(ParticleKind::ShipBuild, center, 20);
        if self.settings.enable_screen_effects {
            self.screen.flash(center, Color::BLUE, 0.4);
        }
        self.audio.play_build();
    }

    /// Beam from attacker to defender, explosion at the defender, shake.
    /// Either planet missing makes the whole recipe a no-op.
    pub fn battle_start(&mut self, attacker: AnchorId, defender: AnchorId) {
        let (Some(from), Some(to)) = (self.stage.center(attacker), self.stage.center(defender))
        else {
            return;
        };
        if self.settings.enable_screen_effects {
            self.screen.laser(from, to);
            self.screen.shake(0.3, 5.0);
        }
        // Battle explosions are a fixed burst, not quality-scaled.
        self.spawn_exact(ParticleKind::Explosion { battle: true }, to, 40);
        self.audio.play_battle(&mut self.particles.rng);
    }

    pub fn planet_conquered(&mut self, anchor: AnchorId) {
        let Some(center) = self.stage.center(anchor) else {
            return;
        };
        if self.settings.enable_screen_effects {
            self.screen.ring(center);
            self.screen.flash(center, Color::GOLD, 0.6);
        }
        self.spawn_scaled(ParticleKind::Victory, center, 50);
        self.audio.play_victory();
    }

    pub fn tech_researched(&mut self, anchor: AnchorId) {
        let Some(center) = self.stage.center(anchor) else {
            return;
        };
        self.spawn_scaled(ParticleKind::Tech, center, 25);
        if self.settings.enable_screen_effects {
            self.screen.flash(center, Color::PURPLE, 0.5);
        }
    }

    /// One particle per ten units gained, at most fifteen.
    pub fn resource_gained(&mut self, anchor: AnchorId, amount: u32, resource: ResourceKind) {
        let Some(center) = self.stage.center(anchor) else {
            return;
        };
        let count = ((amount as f32) / 10.0).min(15.0).floor() as usize;
        self.spawn_exact(ParticleKind::Resource(resource), center, count);
        self.audio.play_resource();
    }

    /// The DOM custom-event path: same recipes, parsed payloads.
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::BuildingConstructed { anchor, building } => {
                self.building_constructed(anchor, building)
            }
            GameEvent::ShipBuilt { anchor } => self.ship_built(anchor),
            GameEvent::BattleStart { attacker, defender } => self.battle_start(attacker, defender),
            GameEvent::PlanetConquered { anchor } => self.planet_conquered(anchor),
            GameEvent::TechResearched { anchor } => self.tech_researched(anchor),
            GameEvent::ResourceGained {
                anchor,
                amount,
                resource,
            } => self.resource_gained(anchor, amount, resource),
        }
    }

    // -- Direct effects --

    /// Floating score/notification text above an anchor.
    pub fn float_text(&mut self, anchor: AnchorId, text: &str, color: Color) {
        if !self.settings.enable_ui_animations {
            return;
        }
        if let Some(center) = self.stage.center(anchor) {
            self.screen.float_text(center, text, color);
        }
    }

    /// One-shot element highlight.
    pub fn glow(&mut self, anchor: AnchorId, color: Color, duration: f32) {
        if !self.settings.enable_ui_animations {
            return;
        }
        self.screen.glow(anchor, &self.stage, color, duration);
    }

    /// Free-position detonation: burst, expanding ring, hard shake.
    pub fn explosion_at(&mut self, pos: Vec2) {
        if self.settings.enable_screen_effects {
            self.screen.ring_sized(pos, 150.0, 0.5);
            self.screen.shake(0.5, 15.0);
        }
        self.spawn_scaled(ParticleKind::Explosion { battle: false }, pos, 30);
        self.audio.play_battle(&mut self.particles.rng);
    }

    // -- Fleets --

    /// Spawn an orbiting fleet, with its launch tone.
    pub fn launch_fleet(
        &mut self,
        anchor: AnchorId,
        class: ShipClass,
        fleet_size: usize,
    ) -> Option<FleetId> {
        let id = self.fleets.launch(anchor, class, fleet_size, &self.stage)?;
        self.audio.play_launch();
        Some(id)
    }

    /// Send every fleet at `from` against `target` as a staggered volley.
    /// Returns the number of ships committed.
    pub fn attack(&mut self, from: AnchorId, target: AnchorId) -> usize {
        let committed = self.fleets.attack_from(from, target, &self.stage);
        if committed > 0 {
            self.audio.play_battle(&mut self.particles.rng);
        }
        committed
    }

    pub fn set_orbit_speed(&mut self, fleet: FleetId, fast: bool) {
        self.fleets.set_orbit_speed(fleet, fast);
    }

    pub fn remove_fleet(&mut self, fleet: FleetId) {
        self.fleets.remove(fleet);
    }

    // -- Audio passthrough --

    pub fn button_click(&mut self) {
        self.audio.play_button_click();
    }

    pub fn end_turn(&mut self) {
        self.audio.play_end_turn();
    }

    pub fn defeat(&mut self) {
        self.audio.play_defeat();
    }

    pub fn toggle_music(&mut self) -> bool {
        self.audio.toggle_music()
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.audio.toggle_sfx()
    }

    // -- Settings & diagnostics --

    /// Merge a settings patch. Dropping the quality tier sheds excess
    /// particles immediately; disabling a family cancels its live effects
    /// through the exactly-once restore paths.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        let before = self.settings;
        self.settings.apply(patch);
        self.particles.enforce_cap(self.settings.particle_cap());
        if before.enable_screen_effects && !self.settings.enable_screen_effects {
            self.screen.cancel_shakes();
        }
        if before.enable_ui_animations && !self.settings.enable_ui_animations {
            self.screen.cancel_glows();
        }
        log::debug!("effect settings now {:?}", self.settings);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> PerfStats {
        PerfStats {
            frame_time_ms: self.clock.frame_time_ms(),
            particle_count: self.particles.len(),
            effect_count: self.screen.effect_count(),
            fps: self.clock.fps(),
        }
    }

    /// Drop all particles and screen effects, honoring restore guarantees.
    /// Fleets are untouched; use [`clear_all_ships`](Self::clear_all_ships).
    pub fn clear_all_effects(&mut self) {
        self.particles.clear();
        self.screen.clear();
    }

    pub fn clear_all_ships(&mut self) {
        self.fleets.clear();
    }

    pub fn drain_ui_commands(&mut self) -> Vec<UiCommand> {
        self.screen.drain_commands()
    }

    // -- Frame loop --

    /// Advance every registry by one step of engine time.
    pub fn tick(&mut self, dt: f32) {
        self.clock.advance(dt);
        self.particles.tick(dt);
        self.particles.enforce_cap(self.settings.particle_cap());
        self.screen.tick(dt, &self.stage, &mut self.particles.rng);
        tick_fleets(
            &mut self.fleets,
            &self.stage,
            dt,
            &mut self.particles,
            &mut self.screen,
            &mut self.audio,
        );
        self.audio.tick(dt, &mut self.particles.rng);
    }

    /// Rebuild the frame buffer from the live registries and drain the
    /// tones cued since the last render.
    pub fn render(&mut self) {
        self.frame.begin_frame(self.screen.viewport_offset());
        self.screen.draw(&mut self.frame);
        self.particles.draw(&mut self.frame);
        self.fleets.draw(&mut self.frame);
        for tone in self.audio.drain() {
            self.frame.push_tone(tone.record());
        }
        self.frame.finish();
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn effect_count(&self) -> usize {
        self.screen.effect_count()
    }

    pub fn ship_count(&self) -> usize {
        self.fleets.ship_count()
    }

    // -- Recipe helpers --

    fn spawn_scaled(&mut self, kind: ParticleKind, origin: Vec2, base: usize) {
        let count = self.settings.scaled_count(base);
        self.spawn_exact(kind, origin, count);
    }

    fn spawn_exact(&mut self, kind: ParticleKind, origin: Vec2, count: usize) {
        if !self.settings.enable_particles || count == 0 {
            return;
        }
        self.particles.spawn(kind, origin, count);
        self.particles.enforce_cap(self.settings.particle_cap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::settings::Quality;

    const DT: f32 = 1.0 / 60.0;

    fn engine_with_planets() -> FxEngine {
        let mut fx = FxEngine::new(42);
        fx.register_anchor(AnchorId(1), AnchorRect::new(100.0, 100.0, 80.0, 80.0));
        fx.register_anchor(AnchorId(2), AnchorRect::new(500.0, 100.0, 80.0, 80.0));
        fx
    }

    fn low_quality() -> SettingsPatch {
        SettingsPatch {
            particle_quality: Some(Quality::Low),
            ..Default::default()
        }
    }

    #[test]
    fn construction_count_scales_with_quality() {
        let mut fx = engine_with_planets();
        fx.update_settings(low_quality());
        fx.building_constructed(AnchorId(1), BuildingKind::Habitat);
        // 30 × 0.5 at the low tier.
        assert_eq!(fx.particle_count(), 15);
    }

    #[test]
    fn conquest_recipe_contents() {
        let mut fx = engine_with_planets();
        fx.planet_conquered(AnchorId(1));
        // One ring + one flash, and the full 50 victory particles at high.
        assert_eq!(fx.effect_count(), 2);
        assert_eq!(fx.particle_count(), 50);
    }

    #[test]
    fn battle_needs_both_planets() {
        let mut fx = engine_with_planets();
        fx.battle_start(AnchorId(1), AnchorId(99));
        assert_eq!(fx.particle_count(), 0);
        assert_eq!(fx.effect_count(), 0);

        fx.battle_start(AnchorId(1), AnchorId(2));
        // Beam + shake, and the fixed 40-particle burst.
        assert_eq!(fx.effect_count(), 2);
        assert_eq!(fx.particle_count(), 40);
    }

    #[test]
    fn particle_cap_holds_under_spam() {
        let mut fx = engine_with_planets();
        fx.update_settings(low_quality());
        for _ in 0..20 {
            fx.planet_conquered(AnchorId(1));
        }
        assert!(fx.particle_count() <= 200);
    }

    #[test]
    fn quality_drop_sheds_excess_immediately() {
        let mut fx = engine_with_planets();
        for _ in 0..12 {
            fx.planet_conquered(AnchorId(1)); // 600 spawned, capped at 500
        }
        assert_eq!(fx.particle_count(), 500);

        fx.update_settings(low_quality());
        assert_eq!(fx.particle_count(), 200);
    }

    #[test]
    fn resource_particles_follow_amount() {
        let mut fx = engine_with_planets();
        fx.resource_gained(AnchorId(1), 80, ResourceKind::Energy);
        assert_eq!(fx.particle_count(), 8);

        let mut fx = engine_with_planets();
        fx.resource_gained(AnchorId(1), 400, ResourceKind::Materials);
        assert_eq!(fx.particle_count(), 15, "capped at fifteen");

        let mut fx = engine_with_planets();
        fx.resource_gained(AnchorId(1), 5, ResourceKind::Research);
        assert_eq!(fx.particle_count(), 0, "sub-ten gains stay quiet");
    }

    #[test]
    fn disabling_particles_gates_spawns() {
        let mut fx = engine_with_planets();
        fx.update_settings(SettingsPatch {
            enable_particles: Some(false),
            ..Default::default()
        });
        fx.planet_conquered(AnchorId(1));
        assert_eq!(fx.particle_count(), 0);
        // Screen effects still fire.
        assert_eq!(fx.effect_count(), 2);
    }

    #[test]
    fn settings_change_restores_shake_and_glow_once() {
        let mut fx = engine_with_planets();
        fx.battle_start(AnchorId(1), AnchorId(2));
        fx.building_constructed(AnchorId(1), BuildingKind::Habitat);
        fx.tick(DT);
        assert_ne!(fx.screen.viewport_offset(), Vec2::ZERO);

        fx.update_settings(SettingsPatch {
            enable_screen_effects: Some(false),
            enable_ui_animations: Some(false),
            ..Default::default()
        });
        assert_eq!(fx.screen.viewport_offset(), Vec2::ZERO);

        let clears = fx
            .drain_ui_commands()
            .into_iter()
            .filter(|c| matches!(c, UiCommand::ClearGlow { .. }))
            .count();
        assert_eq!(clears, 1);

        // Ticking on must not re-emit the clear.
        fx.tick(DT);
        assert!(fx
            .drain_ui_commands()
            .iter()
            .all(|c| !matches!(c, UiCommand::ClearGlow { .. })));
    }

    #[test]
    fn events_route_to_recipes() {
        let mut fx = engine_with_planets();
        let event: GameEvent =
            serde_json::from_str(r#"{"kind":"techResearched","anchor":1}"#).unwrap();
        fx.handle_event(event);
        assert_eq!(fx.particle_count(), 25);
        assert_eq!(fx.effect_count(), 1);
    }

    #[test]
    fn trigger_on_missing_anchor_is_noop() {
        let mut fx = FxEngine::new(1);
        fx.building_constructed(AnchorId(5), BuildingKind::Shipyard);
        fx.planet_conquered(AnchorId(5));
        fx.resource_gained(AnchorId(5), 100, ResourceKind::Energy);
        assert_eq!(fx.particle_count(), 0);
        assert_eq!(fx.effect_count(), 0);
    }

    #[test]
    fn render_fills_the_frame() {
        let mut fx = engine_with_planets();
        fx.planet_conquered(AnchorId(1));
        fx.launch_fleet(AnchorId(2), ShipClass::Fighter, 3);
        fx.tick(DT);
        fx.render();

        let frame = fx.frame();
        // 50 particles + 2 ring circles + 1 flash glow.
        assert_eq!(frame.shape_count(), 53);
        assert_eq!(frame.sprite_count(), 3);
        // Conquest arpeggio note 1 + launch tone are due this frame.
        assert!(frame.tone_count() >= 2);
    }

    #[test]
    fn effects_expire_to_an_empty_frame() {
        let mut fx = engine_with_planets();
        fx.planet_conquered(AnchorId(1));
        for _ in 0..400 {
            fx.tick(DT);
        }
        fx.render();
        assert_eq!(fx.particle_count(), 0);
        assert_eq!(fx.effect_count(), 0);
        assert_eq!(fx.frame().shape_count(), 0);
    }

    #[test]
    fn stats_track_live_counts() {
        let mut fx = engine_with_planets();
        fx.battle_start(AnchorId(1), AnchorId(2));
        fx.tick(DT);
        let stats = fx.stats();
        assert_eq!(stats.particle_count, 40);
        assert_eq!(stats.effect_count, 2);
        assert!((stats.frame_time_ms - DT * 1000.0).abs() < 0.01);
        assert_eq!(stats.fps, 60);
    }

    #[test]
    fn attack_commits_ships_and_cues_battle() {
        let mut fx = engine_with_planets();
        fx.launch_fleet(AnchorId(1), ShipClass::Cruiser, 3);
        for _ in 0..90 {
            fx.tick(DT);
        }
        assert_eq!(fx.attack(AnchorId(1), AnchorId(2)), 3);
        assert_eq!(fx.attack(AnchorId(1), AnchorId(99)), 0);
    }

    #[test]
    fn removed_anchor_winds_down_its_fleet() {
        let mut fx = engine_with_planets();
        fx.launch_fleet(AnchorId(1), ShipClass::Scout, 2);
        for _ in 0..90 {
            fx.tick(DT);
        }
        assert_eq!(fx.ship_count(), 2);

        fx.remove_anchor(AnchorId(1));
        for _ in 0..60 {
            fx.tick(DT);
        }
        assert_eq!(fx.ship_count(), 0);
    }
}
