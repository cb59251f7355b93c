pub mod runner;

pub use runner::FxRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use nebula_engine::HEADER_FLOATS;

thread_local! {
    static RUNNER: RefCell<Option<FxRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut FxRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("effects not initialized. Call fx_init() first.");
        f(runner)
    })
}

/// Initialize the effects runner. Must be called before any other export.
/// The RNG is seeded from the clock; tests construct `FxRunner` directly
/// with a fixed seed instead.
#[wasm_bindgen]
pub fn fx_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let seed = js_sys::Date::now().to_bits();
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(FxRunner::new(seed));
    });
    log::info!("nebula effects: initialized");
}

#[wasm_bindgen]
pub fn fx_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Anchors ----

#[wasm_bindgen]
pub fn fx_register_anchor(id: u32, x: f32, y: f32, width: f32, height: f32) {
    with_runner(|r| r.register_anchor(id, x, y, width, height));
}

#[wasm_bindgen]
pub fn fx_update_anchor(id: u32, x: f32, y: f32, width: f32, height: f32) {
    with_runner(|r| r.update_anchor(id, x, y, width, height));
}

#[wasm_bindgen]
pub fn fx_remove_anchor(id: u32) {
    with_runner(|r| r.remove_anchor(id));
}

// ---- Events & settings ----

#[wasm_bindgen]
pub fn fx_event(json: &str) {
    with_runner(|r| r.handle_event_json(json));
}

#[wasm_bindgen]
pub fn fx_update_settings(json: &str) {
    with_runner(|r| r.update_settings_json(json));
}

#[wasm_bindgen]
pub fn fx_stats() -> String {
    with_runner(|r| r.stats_json())
}

#[wasm_bindgen]
pub fn fx_ui_commands() -> String {
    with_runner(|r| r.ui_commands_json())
}

#[wasm_bindgen]
pub fn fx_clear() {
    with_runner(|r| r.engine_mut().clear_all_effects());
}

// ---- Fleets ----

#[wasm_bindgen]
pub fn fx_launch_fleet(anchor: u32, class: &str, fleet_size: u32) -> u32 {
    with_runner(|r| r.launch_fleet(anchor, class, fleet_size))
}

#[wasm_bindgen]
pub fn fx_attack(from: u32, target: u32) -> u32 {
    with_runner(|r| r.attack(from, target))
}

#[wasm_bindgen]
pub fn fx_set_orbit_speed(fleet: u32, fast: bool) {
    with_runner(|r| r.set_orbit_speed(fleet, fast));
}

#[wasm_bindgen]
pub fn fx_remove_fleet(fleet: u32) {
    with_runner(|r| r.remove_fleet(fleet));
}

#[wasm_bindgen]
pub fn fx_clear_ships() {
    with_runner(|r| r.engine_mut().clear_all_ships());
}

// ---- Direct effects ----

#[wasm_bindgen]
pub fn fx_float_text(anchor: u32, text: &str, r: f32, g: f32, b: f32) {
    with_runner(|run| run.float_text(anchor, text, r, g, b));
}

#[wasm_bindgen]
pub fn fx_glow(anchor: u32, r: f32, g: f32, b: f32, duration: f32) {
    with_runner(|run| run.glow(anchor, r, g, b, duration));
}

#[wasm_bindgen]
pub fn fx_explosion(x: f32, y: f32) {
    with_runner(|r| r.explosion(x, y));
}

// ---- Audio ----

#[wasm_bindgen]
pub fn fx_button_click() {
    with_runner(|r| r.engine_mut().button_click());
}

#[wasm_bindgen]
pub fn fx_end_turn() {
    with_runner(|r| r.engine_mut().end_turn());
}

#[wasm_bindgen]
pub fn fx_defeat() {
    with_runner(|r| r.engine_mut().defeat());
}

#[wasm_bindgen]
pub fn fx_toggle_music() -> bool {
    with_runner(|r| r.engine_mut().toggle_music())
}

#[wasm_bindgen]
pub fn fx_toggle_sfx() -> bool {
    with_runner(|r| r.engine_mut().toggle_sfx())
}

// ---- Data accessors (zero-copy Float32Array views) ----

#[wasm_bindgen]
pub fn fx_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr())
}

#[wasm_bindgen]
pub fn fx_header_len() -> u32 {
    HEADER_FLOATS as u32
}

#[wasm_bindgen]
pub fn fx_shapes_ptr() -> *const f32 {
    with_runner(|r| r.shapes_ptr())
}

#[wasm_bindgen]
pub fn fx_sprites_ptr() -> *const f32 {
    with_runner(|r| r.sprites_ptr())
}

#[wasm_bindgen]
pub fn fx_tones_ptr() -> *const f32 {
    with_runner(|r| r.tones_ptr())
}
