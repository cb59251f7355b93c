use nebula_engine::{
    AnchorId, AnchorRect, Color, FixedTimestep, FleetId, FxEngine, GameEvent, SettingsPatch,
    ShipClass,
};

/// Wraps the engine in a fixed-timestep loop and owns the JSON seams.
///
/// The page feeds it raw `CustomEvent.detail` / settings JSON; malformed
/// payloads are logged and dropped so a page bug can never take down the
/// render loop.
pub struct FxRunner {
    engine: FxEngine,
    timestep: FixedTimestep,
}

impl FxRunner {
    pub fn new(seed: u64) -> Self {
        FxRunner {
            engine: FxEngine::new(seed),
            timestep: FixedTimestep::new(1.0 / 60.0),
        }
    }

    /// Run one browser frame: zero or more fixed steps, then a rebuild of
    /// the frame buffer. With no step due, the previous frame stands.
    pub fn tick(&mut self, dt: f32) {
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.engine.tick(self.timestep.dt());
        }
        if steps > 0 {
            self.engine.render();
        }
    }

    // -- Anchors --

    pub fn register_anchor(&mut self, id: u32, x: f32, y: f32, width: f32, height: f32) {
        self.engine
            .register_anchor(AnchorId(id), AnchorRect::new(x, y, width, height));
    }

    pub fn update_anchor(&mut self, id: u32, x: f32, y: f32, width: f32, height: f32) {
        self.engine
            .update_anchor(AnchorId(id), AnchorRect::new(x, y, width, height));
    }

    pub fn remove_anchor(&mut self, id: u32) {
        self.engine.remove_anchor(AnchorId(id));
    }

    // -- JSON seams --

    pub fn handle_event_json(&mut self, json: &str) {
        match serde_json::from_str::<GameEvent>(json) {
            Ok(event) => self.engine.handle_event(event),
            Err(err) => log::warn!("dropping malformed game event: {err}"),
        }
    }

    pub fn update_settings_json(&mut self, json: &str) {
        match serde_json::from_str::<SettingsPatch>(json) {
            Ok(patch) => self.engine.update_settings(patch),
            Err(err) => log::warn!("dropping malformed settings patch: {err}"),
        }
    }

    pub fn ui_commands_json(&mut self) -> String {
        let commands = self.engine.drain_ui_commands();
        serde_json::to_string(&commands).unwrap_or_else(|err| {
            log::error!("ui command serialization failed: {err}");
            "[]".to_string()
        })
    }

    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.engine.stats()).unwrap_or_else(|err| {
            log::error!("stats serialization failed: {err}");
            "{}".to_string()
        })
    }

    // -- Fleet commands --

    pub fn launch_fleet(&mut self, anchor: u32, class: &str, fleet_size: u32) -> u32 {
        let class = match class {
            "scout" => ShipClass::Scout,
            "cruiser" => ShipClass::Cruiser,
            "battleship" => ShipClass::Battleship,
            _ => ShipClass::Fighter,
        };
        self.engine
            .launch_fleet(AnchorId(anchor), class, fleet_size as usize)
            .map(|id| id.0)
            .unwrap_or(0)
    }

    pub fn attack(&mut self, from: u32, target: u32) -> u32 {
        self.engine.attack(AnchorId(from), AnchorId(target)) as u32
    }

    pub fn set_orbit_speed(&mut self, fleet: u32, fast: bool) {
        self.engine.set_orbit_speed(FleetId(fleet), fast);
    }

    pub fn remove_fleet(&mut self, fleet: u32) {
        self.engine.remove_fleet(FleetId(fleet));
    }

    // -- Direct effects --

    pub fn float_text(&mut self, anchor: u32, text: &str, r: f32, g: f32, b: f32) {
        self.engine
            .float_text(AnchorId(anchor), text, Color::rgb(r, g, b));
    }

    pub fn glow(&mut self, anchor: u32, r: f32, g: f32, b: f32, duration: f32) {
        self.engine
            .glow(AnchorId(anchor), Color::rgb(r, g, b), duration);
    }

    pub fn explosion(&mut self, x: f32, y: f32) {
        self.engine.explosion_at(glam::Vec2::new(x, y));
    }

    pub fn engine_mut(&mut self) -> &mut FxEngine {
        &mut self.engine
    }

    // -- Pointer accessors for zero-copy Float32Array views --

    pub fn header_ptr(&self) -> *const f32 {
        self.engine.frame().header_ptr()
    }

    pub fn shapes_ptr(&self) -> *const f32 {
        self.engine.frame().shapes_ptr()
    }

    pub fn sprites_ptr(&self) -> *const f32 {
        self.engine.frame().sprites_ptr()
    }

    pub fn tones_ptr(&self) -> *const f32 {
        self.engine.frame().tones_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_event_json_is_dropped() {
        let mut runner = FxRunner::new(7);
        runner.register_anchor(1, 0.0, 0.0, 100.0, 100.0);
        runner.handle_event_json("{not json");
        runner.handle_event_json(r#"{"kind":"unknownThing","anchor":1}"#);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.engine_mut().particle_count(), 0);
    }

    #[test]
    fn event_json_reaches_the_engine() {
        let mut runner = FxRunner::new(7);
        runner.register_anchor(1, 0.0, 0.0, 100.0, 100.0);
        runner.handle_event_json(r#"{"kind":"shipBuilt","anchor":1}"#);
        assert_eq!(runner.engine_mut().particle_count(), 20);
    }

    #[test]
    fn launch_returns_zero_for_dead_anchor() {
        let mut runner = FxRunner::new(7);
        assert_eq!(runner.launch_fleet(9, "fighter", 3), 0);
        runner.register_anchor(9, 0.0, 0.0, 50.0, 50.0);
        assert!(runner.launch_fleet(9, "fighter", 3) > 0);
    }

    #[test]
    fn sub_step_tick_keeps_previous_frame() {
        let mut runner = FxRunner::new(7);
        runner.register_anchor(1, 0.0, 0.0, 100.0, 100.0);
        runner.handle_event_json(r#"{"kind":"planetConquered","anchor":1}"#);
        runner.tick(1.0 / 60.0);
        let shapes = runner.engine_mut().frame().shape_count();
        assert!(shapes > 0);

        // Less than one fixed step: no re-render, frame unchanged.
        runner.tick(0.001);
        assert_eq!(runner.engine_mut().frame().shape_count(), shapes);
    }

    #[test]
    fn stats_json_is_well_formed() {
        let mut runner = FxRunner::new(7);
        runner.tick(1.0 / 60.0);
        let json = runner.stats_json();
        assert!(json.contains("frameTime"), "{json}");
        assert!(json.contains("particleCount"), "{json}");
        assert!(json.contains("fps"), "{json}");
    }
}
