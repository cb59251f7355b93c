//! Shared identifier and event types.
//!
//! `GameEvent` mirrors the DOM custom-event contract verbatim: the bridge
//! deserializes `CustomEvent.detail` JSON (with the element swapped for its
//! registered anchor id) straight into this enum.

use serde::{Deserialize, Serialize};

/// Identifier for a registered DOM anchor (planet card, building tile, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// Identifier for a fleet of ship markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FleetId(pub u32);

/// Building categories, tagged with their construction-particle tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    PowerPlant,
    ResearchLab,
    MiningFacility,
    Habitat,
    Shipyard,
    DefenseSystem,
    Other,
}

impl<'de> Deserialize<'de> for BuildingKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Unknown building types get the default tint rather than an error,
        // matching the original event contract.
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "power_plant" => BuildingKind::PowerPlant,
            "research_lab" => BuildingKind::ResearchLab,
            "mining_facility" => BuildingKind::MiningFacility,
            "habitat" => BuildingKind::Habitat,
            "shipyard" => BuildingKind::Shipyard,
            "defense_system" => BuildingKind::DefenseSystem,
            _ => BuildingKind::Other,
        })
    }
}

/// Resource categories for gain effects and floating text tints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Energy,
    Research,
    Materials,
    Population,
    Other,
}

impl<'de> Deserialize<'de> for ResourceKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "energy" => ResourceKind::Energy,
            "research" => ResourceKind::Research,
            "materials" => ResourceKind::Materials,
            "population" => ResourceKind::Population,
            _ => ResourceKind::Other,
        })
    }
}

/// Ship hull classes. The sprite index selects the marker glyph browser-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    Scout,
    Fighter,
    Cruiser,
    Battleship,
}

impl ShipClass {
    pub fn sprite_index(self) -> u32 {
        match self {
            ShipClass::Scout => 0,
            ShipClass::Fighter => 1,
            ShipClass::Cruiser => 2,
            ShipClass::Battleship => 3,
        }
    }
}

/// Game events as fired by the rule engine.
///
/// Wire names match the DOM custom events (`buildingConstructed`, ...) and
/// their `detail` payloads, so JSON from the page parses without adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    BuildingConstructed {
        anchor: AnchorId,
        #[serde(rename = "type")]
        building: BuildingKind,
    },
    ShipBuilt {
        anchor: AnchorId,
    },
    BattleStart {
        attacker: AnchorId,
        defender: AnchorId,
    },
    PlanetConquered {
        anchor: AnchorId,
    },
    TechResearched {
        anchor: AnchorId,
    },
    ResourceGained {
        anchor: AnchorId,
        amount: u32,
        #[serde(rename = "type")]
        resource: ResourceKind,
    },
}

/// DOM mutations the engine cannot express as canvas shapes.
///
/// Drained once per frame by the bridge; styles set by `SetGlow` are
/// guaranteed a matching `ClearGlow`, exactly once, even when the owning
/// effect is cancelled mid-flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum UiCommand {
    SetGlow {
        anchor: AnchorId,
        blur: f32,
        color: String,
    },
    ClearGlow {
        anchor: AnchorId,
    },
    FloatText {
        x: f32,
        y: f32,
        text: String,
        color: String,
    },
}

/// Per-frame diagnostics, the `getPerformanceStats()` contract. Serialized
/// field names match the keys the page already reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfStats {
    #[serde(rename = "frameTime")]
    pub frame_time_ms: f32,
    pub particle_count: usize,
    pub effect_count: usize,
    pub fps: u32,
}
