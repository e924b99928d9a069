//! Per-actor UI snapshot pushed through `PresentationSync`.

use serde::{Deserialize, Serialize};

use crate::engine::phase::MatchPhase;
use crate::engine::powerup::PowerupKind;
use crate::engine::team::TeamColor;

/// Sprint gauge readout for the receiving actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaminaReadout {
    pub current: f32,
    pub max: f32,
}

/// Minimap marker for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapActor {
    pub x: f32,
    pub z: f32,
    pub team: TeamColor,
    pub has_weapon: bool,
}

/// Minimap marker for an active pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapPickup {
    pub x: f32,
    pub z: f32,
    pub kind: PowerupKind,
}

/// Everything the HUD needs, pushed at 10Hz while a round runs and on every
/// discrete state change otherwise. Stamina is the only per-recipient field;
/// the rest is shared across all pushes of one cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub phase: MatchPhase,
    pub red_score: u32,
    pub blue_score: u32,
    pub time_remaining_s: u32,
    pub red_team: Vec<String>,
    pub blue_team: Vec<String>,
    pub stamina: StaminaReadout,
    pub minimap_actors: Vec<MinimapActor>,
    pub minimap_pickups: Vec<MinimapPickup>,
}
