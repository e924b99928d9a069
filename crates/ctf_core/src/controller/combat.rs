//! Combat state: equipped weapon, attack cooldown, shield, tag.
//!
//! Contact adjudication between opposing actors follows a strict
//! precedence: shield absorption, then weapon clash, then territory tag.
//! Reordering these changes match fairness, so the order lives in one
//! function.

use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;
use crate::engine::scheduler::TaskId;
use crate::engine::team::TeamColor;
use crate::world::ObjectId;

/// Weapon held by an actor: the attached world object plus whose weapon it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarriedWeapon {
    pub object: ObjectId,
    pub team: TeamColor,
}

/// Shield lifecycle: a held shield absorbs exactly one tag, then a short
/// immunity window runs before the actor is vulnerable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldState {
    None,
    Held,
    Immune { until_ms: u64 },
}

/// Frozen-by-tag record; the respawn task is cancelled if the actor leaves
/// or a full reset intervenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedState {
    pub since_ms: u64,
    pub respawn_task: TaskId,
}

#[derive(Debug)]
pub struct CombatController {
    weapon: Option<CarriedWeapon>,
    cooldown_duration_ms: f32,
    anim_duration_ms: f32,
    attack_cooldown_ms: f32,
    attack_anim_remaining_ms: f32,
    shield: ShieldState,
    tag: Option<TaggedState>,
    last_tag_ms: Option<u64>,
}

impl CombatController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            weapon: None,
            cooldown_duration_ms: config.attack_cooldown_ms,
            anim_duration_ms: config.attack_anim_ms,
            attack_cooldown_ms: 0.0,
            attack_anim_remaining_ms: 0.0,
            shield: ShieldState::None,
            tag: None,
            last_tag_ms: None,
        }
    }

    /// Advance cooldown and animation timers; both floor at zero.
    pub fn update(&mut self, dt_ms: f32) {
        self.attack_cooldown_ms = (self.attack_cooldown_ms - dt_ms).max(0.0);
        self.attack_anim_remaining_ms = (self.attack_anim_remaining_ms - dt_ms).max(0.0);
    }

    // === Attacks ===

    pub fn is_attacking(&self) -> bool {
        self.attack_anim_remaining_ms > 0.0
    }

    /// Start an attack if a weapon is equipped, no attack is in flight, and
    /// the cooldown has elapsed. Returns whether one started.
    pub fn try_start_attack(&mut self) -> bool {
        if self.weapon.is_none() || self.is_attacking() || self.attack_cooldown_ms > 0.0 {
            return false;
        }
        self.attack_anim_remaining_ms = self.anim_duration_ms;
        self.attack_cooldown_ms = self.cooldown_duration_ms;
        true
    }

    pub fn attack_cooldown_ms(&self) -> f32 {
        self.attack_cooldown_ms
    }

    // === Weapon ===

    pub fn weapon(&self) -> Option<CarriedWeapon> {
        self.weapon
    }

    pub fn has_weapon(&self) -> bool {
        self.weapon.is_some()
    }

    pub fn equip_weapon(&mut self, weapon: CarriedWeapon) {
        self.weapon = Some(weapon);
    }

    /// Clear the carried weapon, handing it back for despawning.
    pub fn take_weapon(&mut self) -> Option<CarriedWeapon> {
        self.weapon.take()
    }

    // === Shield ===

    pub fn has_shield(&self) -> bool {
        matches!(self.shield, ShieldState::Held)
    }

    pub fn grant_shield(&mut self) {
        self.shield = ShieldState::Held;
    }

    /// Shield held or immunity window still running.
    pub fn tag_protected(&self, now_ms: u64) -> bool {
        match self.shield {
            ShieldState::None => false,
            ShieldState::Held => true,
            ShieldState::Immune { until_ms } => now_ms < until_ms,
        }
    }

    /// Consume a held shield, starting the immunity window. Consuming an
    /// already-spent shield does nothing, so one hit costs exactly one shield.
    pub fn consume_shield(&mut self, now_ms: u64, immunity_ms: u64) {
        if self.shield == ShieldState::Held {
            self.shield = ShieldState::Immune {
                until_ms: now_ms + immunity_ms,
            };
        }
    }

    // === Tag ===

    pub fn is_tagged(&self) -> bool {
        self.tag.is_some()
    }

    pub fn tagged_state(&self) -> Option<TaggedState> {
        self.tag
    }

    /// A tag attempt is rejected while the actor is already tagged or was
    /// tagged within the debounce window.
    pub fn can_be_tagged(&self, now_ms: u64, debounce_ms: u64) -> bool {
        if self.tag.is_some() {
            return false;
        }
        match self.last_tag_ms {
            Some(last) => now_ms.saturating_sub(last) >= debounce_ms,
            None => true,
        }
    }

    pub fn set_tagged(&mut self, now_ms: u64, respawn_task: TaskId) {
        self.tag = Some(TaggedState {
            since_ms: now_ms,
            respawn_task,
        });
        self.last_tag_ms = Some(now_ms);
    }

    /// Lift the tag, returning the record so the pending respawn task can be
    /// cancelled when the lift did not come from that task itself.
    pub fn clear_tag(&mut self) -> Option<TaggedState> {
        self.tag.take()
    }

    /// Drop all transient combat state on a full reset. The caller is
    /// responsible for despawning the weapon object first via `take_weapon`.
    pub fn reset_transient(&mut self) {
        self.weapon = None;
        self.shield = ShieldState::None;
        self.tag = None;
        self.last_tag_ms = None;
        self.attack_cooldown_ms = 0.0;
        self.attack_anim_remaining_ms = 0.0;
    }
}

// ============================================================================
// Contact adjudication
// ============================================================================

/// Everything adjudication needs to know about one side of a contact.
#[derive(Debug, Clone, Copy)]
pub struct ContactSide {
    pub team: TeamColor,
    pub x: f32,
    pub tag_protected: bool,
    pub has_weapon: bool,
}

/// Result of an opposing-team contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Neither side could tag; nothing happens.
    Ignored,
    /// A shield or immunity window intervened; no tag, no clash.
    ShieldAbsorbed,
    /// At least one side carries a weapon; the exchange ends in a full reset.
    WeaponClash,
    /// Exactly one side stood in its home territory; the intruder is tagged.
    Tagged { first_is_target: bool },
}

/// An actor holds tagging rights only inside its own half of the capture axis.
pub fn in_home_territory(team: TeamColor, x: f32, boundary_x: f32) -> bool {
    match team {
        TeamColor::Red => x > boundary_x,
        TeamColor::Blue => x < boundary_x,
    }
}

/// Adjudicate a contact between two opposing actors.
///
/// Precedence is load-bearing: shield > weapon clash > territory.
pub fn adjudicate(first: &ContactSide, second: &ContactSide, boundary_x: f32) -> ContactOutcome {
    if first.tag_protected || second.tag_protected {
        return ContactOutcome::ShieldAbsorbed;
    }
    if first.has_weapon || second.has_weapon {
        return ContactOutcome::WeaponClash;
    }

    let first_can_tag = in_home_territory(first.team, first.x, boundary_x);
    let second_can_tag = in_home_territory(second.team, second.x, boundary_x);
    match (first_can_tag, second_can_tag) {
        (true, false) => ContactOutcome::Tagged {
            first_is_target: false,
        },
        (false, true) => ContactOutcome::Tagged {
            first_is_target: true,
        },
        _ => ContactOutcome::Ignored,
    }
}
