//! Effect settings and the browser-facing patch contract.

use serde::{Deserialize, Serialize};

/// Particle volume profile. Scales recipe counts and caps the live total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
}

impl Quality {
    /// Recipe count multiplier.
    pub fn multiplier(self) -> f32 {
        match self {
            Quality::Low => 0.5,
            Quality::Medium => 0.75,
            Quality::High => 1.0,
        }
    }

    /// Ceiling on live particles.
    pub fn particle_cap(self) -> usize {
        match self {
            Quality::Low => 200,
            Quality::Medium => 350,
            Quality::High => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub enable_particles: bool,
    pub enable_screen_effects: bool,
    #[serde(rename = "enableUIAnimations")]
    pub enable_ui_animations: bool,
    pub particle_quality: Quality,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enable_particles: true,
            enable_screen_effects: true,
            enable_ui_animations: true,
            particle_quality: Quality::High,
        }
    }
}

impl Settings {
    /// Scale a recipe's base particle count by the quality multiplier.
    pub fn scaled_count(&self, base: usize) -> usize {
        (base as f32 * self.particle_quality.multiplier()).floor() as usize
    }

    pub fn particle_cap(&self) -> usize {
        self.particle_quality.particle_cap()
    }

    /// Merge the recognized fields of a patch.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.enable_particles {
            self.enable_particles = v;
        }
        if let Some(v) = patch.enable_screen_effects {
            self.enable_screen_effects = v;
        }
        if let Some(v) = patch.enable_ui_animations {
            self.enable_ui_animations = v;
        }
        if let Some(v) = patch.particle_quality {
            self.particle_quality = v;
        }
    }
}

/// Partial settings as sent by the page's options screen. Unknown fields in
/// the JSON are ignored rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub enable_particles: Option<bool>,
    pub enable_screen_effects: Option<bool>,
    #[serde(rename = "enableUIAnimations")]
    pub enable_ui_animations: Option<bool>,
    pub particle_quality: Option<Quality>,
}
