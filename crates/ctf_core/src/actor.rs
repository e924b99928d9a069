//! Actor identity and per-actor record.

use serde::{Deserialize, Serialize};

use crate::controller::input::{CameraOrientation, InputState};
use crate::controller::ActorController;
use crate::engine::team::TeamColor;

/// Host-assigned identifier of a connected actor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// One connected actor: display name, team, controller state, latest intent.
#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub team: Option<TeamColor>,
    pub controller: ActorController,
    pub input: InputState,
    pub camera: CameraOrientation,
}

impl Actor {
    pub fn new(id: ActorId, name: String, controller: ActorController) -> Self {
        Self {
            id,
            name,
            team: None,
            controller,
            input: InputState::default(),
            camera: CameraOrientation::default(),
        }
    }
}

const DISPLAY_NAMES: [&str; 25] = [
    "SwordMaster",
    "BladeDancer",
    "KnightRider",
    "DuelMaster",
    "ShadowBlade",
    "StormBringer",
    "DragonSlayer",
    "PhantomKnight",
    "SteelHeart",
    "BattleMage",
    "DuskRaider",
    "FrostBlade",
    "ThunderKnight",
    "MysticWarrior",
    "BladeRunner",
    "StarChaser",
    "DawnBreaker",
    "NightStalker",
    "LightBringer",
    "SkyRider",
    "MoonHunter",
    "SunWarrior",
    "WindWalker",
    "FireDancer",
    "IceRunner",
];

/// Hands out unique display names, recycling them as actors leave.
#[derive(Debug, Default)]
pub struct NameRegistry {
    in_use: std::collections::HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an unused name, numbering a base name once the pool runs dry.
    pub fn claim(&mut self, rng: &mut impl rand::Rng) -> String {
        let available: Vec<&str> = DISPLAY_NAMES
            .iter()
            .copied()
            .filter(|name| !self.in_use.contains(*name))
            .collect();

        let name = if available.is_empty() {
            let base = DISPLAY_NAMES[rng.gen_range(0..DISPLAY_NAMES.len())];
            let mut number = 1;
            while self.in_use.contains(&format!("{base}{number}")) {
                number += 1;
            }
            format!("{base}{number}")
        } else {
            available[rng.gen_range(0..available.len())].to_string()
        };

        self.in_use.insert(name.clone());
        name
    }

    pub fn release(&mut self, name: &str) {
        self.in_use.remove(name);
    }
}
