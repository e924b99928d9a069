//! Transient world pickups: team weapons, speed boosts, shields.
//!
//! Every kind follows the same shape: a sensor pickup on an un-owned world
//! item grants the actor an effect or equip reference, the world instance is
//! despawned, and timed effects schedule their own reversion. Spawn cycles
//! only run while a round is active and are cancelled the instant it ends.

use std::collections::HashMap;

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId};
use crate::config::PowerupConfig;
use crate::controller::combat::CarriedWeapon;
use crate::engine::match_controller::TaskKind;
use crate::engine::scheduler::{TaskId, TaskScheduler};
use crate::engine::team::TeamColor;
use crate::world::{ObjectId, ObjectSpec, PhysicsWorld};

/// Pickup kind. A weapon is a team's flag-equivalent; the other two are
/// personal buffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    SpeedBoost,
    Shield,
    Weapon(TeamColor),
}

/// A pickup lying in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupInstance {
    pub object: ObjectId,
    pub kind: PowerupKind,
    pub position: Vector3<f32>,
    pub spawned_at_ms: u64,
}

/// What a pickup contact resolved to; the match controller turns this into
/// broadcasts and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupResult {
    WeaponEquipped { team: TeamColor },
    SpeedBoostApplied { refreshed: bool },
    ShieldGranted,
    /// Tagged actors cannot grab a weapon; surfaced as a notice.
    RejectedTagged,
    /// Own-team weapon; surfaced as a notice.
    RejectedOwnTeam { team: TeamColor },
    /// Already carrying; silently skipped.
    AlreadyArmed,
}

#[derive(Debug)]
pub struct PowerupEffectManager {
    config: PowerupConfig,
    pickups: HashMap<ObjectId, PowerupInstance>,
    /// Pending boost reversion per actor; refreshed on re-pickup so one
    /// actor never has two concurrent reversions.
    boost_expiries: HashMap<ActorId, TaskId>,
    cycle_tasks: Vec<TaskId>,
}

impl PowerupEffectManager {
    pub fn new(config: PowerupConfig) -> Self {
        Self {
            config,
            pickups: HashMap::new(),
            boost_expiries: HashMap::new(),
            cycle_tasks: Vec::new(),
        }
    }

    pub fn config(&self) -> &PowerupConfig {
        &self.config
    }

    /// Active world pickups, for the minimap.
    pub fn pickups(&self) -> impl Iterator<Item = &PowerupInstance> {
        self.pickups.values()
    }

    // === Spawn cycles ===

    /// Start the per-kind spawn cycles. Idempotent per round: callers stop
    /// cycles before starting them again.
    pub fn start_cycles(&mut self, scheduler: &mut TaskScheduler<TaskKind>) {
        debug_assert!(self.cycle_tasks.is_empty(), "cycles already running");
        self.cycle_tasks = vec![
            scheduler.schedule_repeating(
                self.config.speed_boost_spawn_ms,
                TaskKind::PowerupSpawn(PowerupKind::SpeedBoost),
            ),
            scheduler.schedule_repeating(
                self.config.shield_spawn_ms,
                TaskKind::PowerupSpawn(PowerupKind::Shield),
            ),
            scheduler.schedule_repeating(self.config.weapon_sweep_ms, TaskKind::WeaponSweep),
        ];
    }

    /// Cancel the spawn cycles; called the instant the round ends.
    pub fn stop_cycles(&mut self, scheduler: &mut TaskScheduler<TaskKind>) {
        for task in self.cycle_tasks.drain(..) {
            scheduler.cancel(task);
        }
    }

    /// Drop a buff pickup at a random configured point.
    pub fn spawn_buff_pickup(
        &mut self,
        kind: PowerupKind,
        now_ms: u64,
        rng: &mut impl Rng,
        physics: &mut dyn PhysicsWorld,
    ) {
        let points = &self.config.pickup_spawn_points;
        if points.is_empty() {
            return;
        }
        let position = points[rng.gen_range(0..points.len())];
        let object = physics.spawn_object(&ObjectSpec::pickup(kind, position));
        log::debug!("spawned {:?} pickup at {:?}", kind, position);
        self.pickups.insert(
            object,
            PowerupInstance {
                object,
                kind,
                position,
                spawned_at_ms: now_ms,
            },
        );
    }

    /// Drop a team's weapon at its fixed spawn point.
    pub fn spawn_weapon(
        &mut self,
        team: TeamColor,
        position: Vector3<f32>,
        now_ms: u64,
        physics: &mut dyn PhysicsWorld,
    ) {
        let object = physics.spawn_object(&ObjectSpec::loose_weapon(team, position));
        log::debug!("spawned {} weapon at {:?}", team.name(), position);
        self.pickups.insert(
            object,
            PowerupInstance {
                object,
                kind: PowerupKind::Weapon(team),
                position,
                spawned_at_ms: now_ms,
            },
        );
    }

    /// A loose instance of this team's weapon exists in the world.
    pub fn loose_weapon_exists(&self, team: TeamColor) -> bool {
        self.pickups
            .values()
            .any(|pickup| pickup.kind == PowerupKind::Weapon(team))
    }

    // === Pickup resolution ===

    /// Resolve an actor entering a pickup sensor. Returns `None` when the
    /// object is not a live pickup (already taken, or never ours): nothing
    /// to do, not an error.
    pub fn handle_pickup(
        &mut self,
        actor: &mut Actor,
        object: ObjectId,
        scheduler: &mut TaskScheduler<TaskKind>,
        physics: &mut dyn PhysicsWorld,
    ) -> Option<PickupResult> {
        let instance = *self.pickups.get(&object)?;

        let result = match instance.kind {
            PowerupKind::Weapon(team) => {
                return self.try_equip_weapon(actor, instance, team, physics);
            }
            PowerupKind::SpeedBoost => {
                let refreshed = self.apply_speed_boost(actor, scheduler);
                PickupResult::SpeedBoostApplied { refreshed }
            }
            PowerupKind::Shield => {
                actor.controller.combat.grant_shield();
                PickupResult::ShieldGranted
            }
        };

        self.pickups.remove(&object);
        physics.despawn_object(object);
        Some(result)
    }

    fn try_equip_weapon(
        &mut self,
        actor: &mut Actor,
        instance: PowerupInstance,
        weapon_team: TeamColor,
        physics: &mut dyn PhysicsWorld,
    ) -> Option<PickupResult> {
        if actor.controller.combat.has_weapon() {
            return Some(PickupResult::AlreadyArmed);
        }
        if actor.controller.combat.is_tagged() {
            return Some(PickupResult::RejectedTagged);
        }
        if actor.team != Some(weapon_team.opponent()) {
            return Some(PickupResult::RejectedOwnTeam { team: weapon_team });
        }

        self.pickups.remove(&instance.object);
        physics.despawn_object(instance.object);

        let carried = physics.spawn_object(&ObjectSpec::carried_weapon(weapon_team, actor.id));
        actor.controller.combat.equip_weapon(CarriedWeapon {
            object: carried,
            team: weapon_team,
        });
        log::info!("{} equipped the {} weapon", actor.name, weapon_team.name());
        Some(PickupResult::WeaponEquipped { team: weapon_team })
    }

    /// Apply or refresh a speed boost. The movement controller keeps its
    /// base velocities untouched, so reversion is exact regardless of how
    /// many pickups landed while the effect ran.
    fn apply_speed_boost(
        &mut self,
        actor: &mut Actor,
        scheduler: &mut TaskScheduler<TaskKind>,
    ) -> bool {
        let refreshed = match self.boost_expiries.remove(&actor.id) {
            Some(previous) => {
                scheduler.cancel(previous);
                true
            }
            None => false,
        };

        actor
            .controller
            .movement
            .set_speed_multiplier(self.config.speed_boost_factor);
        let expiry = scheduler.schedule_once(
            self.config.speed_boost_duration_ms,
            TaskKind::BoostExpiry { actor: actor.id },
        );
        self.boost_expiries.insert(actor.id, expiry);
        refreshed
    }

    /// Boost duration elapsed: restore the base velocities verbatim.
    pub fn boost_expired(&mut self, actor: &mut Actor) {
        self.boost_expiries.remove(&actor.id);
        actor.controller.movement.clear_speed_multiplier();
        log::debug!("speed boost expired for {}", actor.name);
    }

    /// Forget any pending reversion for a departing actor.
    pub fn forget_actor(&mut self, actor: ActorId, scheduler: &mut TaskScheduler<TaskKind>) {
        if let Some(task) = self.boost_expiries.remove(&actor) {
            scheduler.cancel(task);
        }
    }

    // === Resets ===

    /// Despawn every loose weapon; buff pickups stay (score resets only
    /// recycle weapons).
    pub fn despawn_loose_weapons(&mut self, physics: &mut dyn PhysicsWorld) {
        self.despawn_matching(physics, |kind| matches!(kind, PowerupKind::Weapon(_)));
    }

    /// Despawn every pickup in the world.
    pub fn despawn_all(&mut self, physics: &mut dyn PhysicsWorld) {
        self.despawn_matching(physics, |_| true);
    }

    fn despawn_matching(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        matches: impl Fn(PowerupKind) -> bool,
    ) {
        let doomed: Vec<ObjectId> = self
            .pickups
            .values()
            .filter(|pickup| matches(pickup.kind))
            .map(|pickup| pickup.object)
            .collect();
        for object in doomed {
            self.pickups.remove(&object);
            physics.despawn_object(object);
        }
    }

    /// Full teardown: cancel every handle this component created, then
    /// clear the world of pickups.
    pub fn reset(
        &mut self,
        scheduler: &mut TaskScheduler<TaskKind>,
        physics: &mut dyn PhysicsWorld,
    ) {
        self.stop_cycles(scheduler);
        for (_, task) in self.boost_expiries.drain() {
            scheduler.cancel(task);
        }
        self.despawn_all(physics);
    }
}
