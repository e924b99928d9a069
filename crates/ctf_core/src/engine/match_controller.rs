//! Top-level match state machine.
//!
//! Owns all match-wide state: phase, scores, round clock, rosters, pickups,
//! the task scheduler, and the actor table. Everything time-driven runs
//! through `TaskScheduler`; everything collision-driven comes in through
//! `handle_contact`; the fixed-step physics loop calls `simulation_tick`.
//! No other component mutates phase or scores.
//!
//! Every task handler re-checks the current phase first: a timer that
//! outlives the round that scheduled it is a no-op, never an error.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actor::{Actor, ActorId, NameRegistry};
use crate::config::{MatchConfig, MovementConfig, PowerupConfig};
use crate::controller::combat::{adjudicate, ContactOutcome, ContactSide};
use crate::controller::input::{CameraOrientation, InputState};
use crate::controller::movement::{BodyState, MovementPermissions};
use crate::controller::ActorController;
use crate::engine::events::{ContactBody, ContactEvent, EventKind, MatchEvent};
use crate::engine::phase::{MatchPhase, PhaseMachine};
use crate::engine::powerup::{PickupResult, PowerupEffectManager, PowerupKind};
use crate::engine::scheduler::{TaskId, TaskScheduler};
use crate::engine::score::ScoreZoneEvaluator;
use crate::engine::snapshot::{MinimapActor, MinimapPickup, StaminaReadout, UiSnapshot};
use crate::engine::team::{JoinOutcome, TeamColor, TeamManager};
use crate::error::{ConfigError, EngineError, Result};
use crate::world::{chat_color, Host, ObjectId, PhysicsWorld};

/// Everything the scheduler can fire. Tasks carry data, not closures, so
/// cleanup can enumerate and cancel all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// One-second lobby countdown tick.
    CountdownTick,
    /// 100ms round poll: clock decrement plus scoring check.
    RoundPoll,
    /// Periodic score broadcast.
    ScoreAnnounce,
    /// 10Hz UI snapshot push.
    StateBroadcast,
    /// Drop a buff pickup of this kind.
    PowerupSpawn(PowerupKind),
    /// Re-spawn team weapons lost to the world.
    WeaponSweep,
    /// Speed boost reversion.
    BoostExpiry { actor: ActorId },
    /// Tagged actor becomes free again.
    Respawn { actor: ActorId },
    /// Post-reset settle delay elapsed: spawn one weapon per team.
    WeaponSettle,
    /// Ending delay elapsed: run the full cleanup.
    EndCleanup,
}

pub struct MatchController {
    config: MatchConfig,
    movement_config: MovementConfig,

    phase: PhaseMachine,
    red_score: u32,
    blue_score: u32,
    /// Countdown or round clock, integer milliseconds so repeated poll
    /// decrements land on exactly zero.
    time_remaining_ms: u64,

    teams: TeamManager,
    powerups: PowerupEffectManager,
    score_zones: ScoreZoneEvaluator,
    scheduler: TaskScheduler<TaskKind>,
    actors: BTreeMap<ActorId, Actor>,
    names: NameRegistry,
    rng: ChaCha8Rng,
    events: Vec<MatchEvent>,

    countdown_task: Option<TaskId>,
    round_tasks: Vec<TaskId>,
    weapon_settle_task: Option<TaskId>,
    end_cleanup_task: Option<TaskId>,
}

impl MatchController {
    pub fn new(
        config: MatchConfig,
        movement_config: MovementConfig,
        powerup_config: PowerupConfig,
        seed: u64,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        powerup_config.validate()?;

        Ok(Self {
            score_zones: ScoreZoneEvaluator::new(&config),
            teams: TeamManager::new(config.max_team_size),
            powerups: PowerupEffectManager::new(powerup_config),
            time_remaining_ms: config.round_duration_s as u64 * 1_000,
            config,
            movement_config,
            phase: PhaseMachine::new(),
            red_score: 0,
            blue_score: 0,
            scheduler: TaskScheduler::new(),
            actors: BTreeMap::new(),
            names: NameRegistry::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
            countdown_task: None,
            round_tasks: Vec::new(),
            weapon_settle_task: None,
            end_cleanup_task: None,
        })
    }

    // === Accessors ===

    pub fn phase(&self) -> MatchPhase {
        self.phase.current()
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.red_score, self.blue_score)
    }

    pub fn time_remaining_s(&self) -> f32 {
        self.time_remaining_ms as f32 / 1_000.0
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn team_count(&self, team: TeamColor) -> usize {
        self.teams.count(team)
    }

    /// Outstanding scheduled tasks; zero after a full cleanup.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Drain the outbound event log.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    // === Actor lifecycle ===

    /// Register a newly connected actor and drop it at the lobby spawn.
    pub fn actor_joined(&mut self, id: ActorId, host: &mut dyn Host) -> Result<()> {
        if self.actors.contains_key(&id) {
            return Err(EngineError::DuplicateActor(id));
        }

        let name = self.names.claim(&mut self.rng);
        log::info!("{id} connected as {name}");
        self.actors
            .insert(id, Actor::new(id, name, ActorController::new(&self.movement_config)));
        host.set_position(id, self.config.lobby_spawn);

        host.broadcast("=== Welcome to Capture the Sword! ===", chat_color::GREEN);
        host.broadcast(
            "Steal the enemy team's sword and carry it across your scoring line.",
            chat_color::GREEN,
        );
        host.broadcast(
            "Tag intruders in your territory to freeze them. Most points after five minutes wins!",
            chat_color::GREEN,
        );
        self.push_ui_all(host);
        Ok(())
    }

    /// Tear down a departing actor: pending timers, carried weapon, roster
    /// slot. The last actor out triggers the full cleanup.
    pub fn actor_left(&mut self, id: ActorId, host: &mut dyn Host) {
        let Some(mut actor) = self.actors.remove(&id) else {
            return;
        };
        log::info!("{} disconnected", actor.name);

        if let Some(tag) = actor.controller.combat.clear_tag() {
            self.scheduler.cancel(tag.respawn_task);
        }
        self.powerups.forget_actor(id, &mut self.scheduler);
        if let Some(weapon) = actor.controller.combat.take_weapon() {
            host.despawn_object(weapon.object);
        }
        self.teams.remove(id);
        self.names.release(&actor.name);

        if self.actors.is_empty() {
            self.full_cleanup(host);
        } else {
            self.push_ui_all(host);
        }
    }

    /// Record the actor's latest input; consumed by the next simulation tick.
    pub fn set_input(
        &mut self,
        id: ActorId,
        input: InputState,
        camera: CameraOrientation,
    ) -> Result<()> {
        let actor = self.actors.get_mut(&id).ok_or(EngineError::UnknownActor(id))?;
        actor.input = input;
        actor.camera = camera;
        Ok(())
    }

    // === Team joins ===

    /// Actor asked to join `team` (walked into a team captain's sensor).
    pub fn request_join(&mut self, id: ActorId, team: TeamColor, host: &mut dyn Host) -> Result<()> {
        if !self.actors.contains_key(&id) {
            return Err(EngineError::UnknownActor(id));
        }

        if !self.phase.current().accepts_joins() {
            host.broadcast("Cannot change teams during an active round!", chat_color::RED);
            return Ok(());
        }

        match self.teams.join(id, team) {
            JoinOutcome::Joined(target) => {
                let name = match self.actors.get_mut(&id) {
                    Some(actor) => {
                        actor.team = Some(target);
                        actor.name.clone()
                    }
                    None => return Ok(()),
                };
                host.broadcast(
                    &format!("{} joined the {} team!", name, target.name()),
                    target.chat_color(),
                );
                self.push_ui_all(host);
                self.maybe_start_countdown(host);
            }
            JoinOutcome::Spectator => {
                host.broadcast(
                    "Teams are full! You have been moved to the spectator area.",
                    chat_color::RED,
                );
                host.set_position(id, self.config.spectator_position);
            }
        }
        Ok(())
    }

    fn maybe_start_countdown(&mut self, host: &mut dyn Host) {
        if self.phase.current() != MatchPhase::AwaitingPlayers || !self.teams.both_populated() {
            return;
        }

        self.phase.transition(MatchPhase::Starting, self.scheduler.now());
        self.time_remaining_ms = self.config.lobby_countdown_s as u64 * 1_000;
        self.countdown_task = Some(self.scheduler.schedule_repeating(1_000, TaskKind::CountdownTick));

        self.push_event(EventKind::CountdownStarted);
        host.broadcast("Teams are ready! The game is about to start!", chat_color::GREEN);
        host.broadcast("More players can still join during the countdown!", chat_color::GREEN);
        self.push_ui_all(host);
    }

    // === Scheduler pump ===

    /// Run every task due at or before `now_ms`. The host calls this from
    /// its timer loop; tests call it with virtual timestamps.
    pub fn advance(&mut self, now_ms: u64, host: &mut dyn Host) {
        while let Some((_, kind)) = self.scheduler.next_due(now_ms) {
            self.dispatch_task(kind, host);
        }
    }

    fn dispatch_task(&mut self, kind: TaskKind, host: &mut dyn Host) {
        match kind {
            TaskKind::CountdownTick => self.on_countdown_tick(host),
            TaskKind::RoundPoll => self.on_round_poll(host),
            TaskKind::ScoreAnnounce => self.on_score_announce(host),
            TaskKind::StateBroadcast => self.on_state_broadcast(host),
            TaskKind::PowerupSpawn(powerup) => self.on_powerup_spawn(powerup, host),
            TaskKind::WeaponSweep => self.on_weapon_sweep(host),
            TaskKind::BoostExpiry { actor } => self.on_boost_expiry(actor),
            TaskKind::Respawn { actor } => self.on_respawn(actor, host),
            TaskKind::WeaponSettle => self.on_weapon_settle(host),
            TaskKind::EndCleanup => self.on_end_cleanup(host),
        }
    }

    // === Countdown ===

    fn on_countdown_tick(&mut self, host: &mut dyn Host) {
        if self.phase.current() != MatchPhase::Starting {
            return;
        }

        self.time_remaining_ms = self.time_remaining_ms.saturating_sub(1_000);
        self.apply_balance(host);

        // Fast start: everyone already picked a side, no point waiting out
        // the full countdown.
        let fast_start_ms = self.config.fast_start_s as u64 * 1_000;
        let everyone_teamed =
            !self.actors.is_empty() && self.actors.values().all(|actor| actor.team.is_some());
        if everyone_teamed && self.time_remaining_ms > fast_start_ms {
            self.time_remaining_ms = fast_start_ms;
            host.broadcast("Everyone has a team! Starting early!", chat_color::GREEN);
            self.apply_balance(host);
        }

        let remaining = (self.time_remaining_ms / 1_000) as u32;
        if remaining == 60 || remaining == 30 || (1..=10).contains(&remaining) {
            host.broadcast(
                &format!("Game starting in {remaining} seconds!"),
                chat_color::GREEN,
            );
        }
        self.push_ui_all(host);

        if self.time_remaining_ms == 0 {
            if let Some(task) = self.countdown_task.take() {
                self.scheduler.cancel(task);
            }
            self.force_assign_teams(host);
            self.apply_balance(host);
            self.start_round(host);
        }
    }

    fn apply_balance(&mut self, host: &mut dyn Host) {
        for (id, to) in self.teams.balance(&mut self.rng) {
            let Some(actor) = self.actors.get_mut(&id) else {
                continue;
            };
            actor.team = Some(to);
            host.broadcast(
                &format!("{} was moved to the {} team to even the sides.", actor.name, to.name()),
                to.chat_color(),
            );
        }
    }

    fn force_assign_teams(&mut self, host: &mut dyn Host) {
        let unassigned: Vec<ActorId> = self
            .actors
            .values()
            .filter(|actor| actor.team.is_none())
            .map(|actor| actor.id)
            .collect();

        for (id, placement) in self.teams.assign_remaining(&unassigned, &mut self.rng) {
            let Some(actor) = self.actors.get_mut(&id) else {
                continue;
            };
            match placement {
                Some(team) => {
                    actor.team = Some(team);
                    host.broadcast(
                        &format!("{} was assigned to the {} team!", actor.name, team.name()),
                        team.chat_color(),
                    );
                }
                None => {
                    host.broadcast(
                        &format!("{} is spectating this round.", actor.name),
                        chat_color::YELLOW,
                    );
                    host.set_position(id, self.config.spectator_position);
                }
            }
        }
    }

    // === Round ===

    fn start_round(&mut self, host: &mut dyn Host) {
        self.phase.transition(MatchPhase::InProgress, self.scheduler.now());
        self.red_score = 0;
        self.blue_score = 0;
        self.time_remaining_ms = self.config.round_duration_s as u64 * 1_000;

        self.round_tasks = vec![
            self.scheduler
                .schedule_repeating(self.config.round_poll_ms, TaskKind::RoundPoll),
            self.scheduler
                .schedule_repeating(self.config.score_announce_ms, TaskKind::ScoreAnnounce),
            self.scheduler
                .schedule_repeating(self.config.state_broadcast_ms, TaskKind::StateBroadcast),
        ];
        self.powerups.start_cycles(&mut self.scheduler);

        self.reset_positions_and_weapons(host);

        let minutes = self.config.round_duration_s / 60;
        host.broadcast(
            &format!("Round started! You have {minutes} minutes!"),
            chat_color::GREEN,
        );
        self.push_event(EventKind::RoundStarted);
        self.push_ui_all(host);
    }

    fn on_round_poll(&mut self, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }

        self.time_remaining_ms = self.time_remaining_ms.saturating_sub(self.config.round_poll_ms);

        let hit = self.score_zones.check(self.actors.values(), &*host);
        if let Some(hit) = hit {
            self.apply_score(hit.team, hit.carrier, host);
        }

        if self.time_remaining_ms == 0 {
            self.end_round(host);
        }
    }

    fn apply_score(&mut self, team: TeamColor, carrier: ActorId, host: &mut dyn Host) {
        match team {
            TeamColor::Red => self.red_score += 1,
            TeamColor::Blue => self.blue_score += 1,
        }
        log::info!(
            "{} scored, red {} blue {}",
            team.name(),
            self.red_score,
            self.blue_score
        );
        host.broadcast(
            &format!(
                "{} team scored! Red: {}, Blue: {}",
                team.name().to_uppercase(),
                self.red_score,
                self.blue_score
            ),
            chat_color::YELLOW,
        );
        self.push_event(EventKind::Scored { team, carrier });
        self.reset_positions_and_weapons(host);
        self.push_ui_all(host);
    }

    fn on_score_announce(&mut self, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }
        host.broadcast(
            &format!(
                "Current Score - Red: {}, Blue: {}",
                self.red_score, self.blue_score
            ),
            chat_color::YELLOW,
        );
    }

    fn on_state_broadcast(&mut self, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }
        self.push_ui_all(host);
    }

    fn end_round(&mut self, host: &mut dyn Host) {
        self.phase.transition(MatchPhase::Ending, self.scheduler.now());

        for task in self.round_tasks.drain(..) {
            self.scheduler.cancel(task);
        }
        self.powerups.stop_cycles(&mut self.scheduler);
        if let Some(task) = self.weapon_settle_task.take() {
            self.scheduler.cancel(task);
        }

        let winner = match self.red_score.cmp(&self.blue_score) {
            std::cmp::Ordering::Greater => Some(TeamColor::Red),
            std::cmp::Ordering::Less => Some(TeamColor::Blue),
            std::cmp::Ordering::Equal => None,
        };
        match winner {
            Some(team) => host.broadcast(
                &format!("Game Over - {} team wins!", team.name().to_uppercase()),
                chat_color::YELLOW,
            ),
            None => host.broadcast("Game Over - It's a tie!", chat_color::YELLOW),
        }
        host.broadcast(
            &format!(
                "Final Scores - Red: {}, Blue: {}",
                self.red_score, self.blue_score
            ),
            chat_color::YELLOW,
        );

        self.push_event(EventKind::RoundEnded { winner });
        self.end_cleanup_task = Some(
            self.scheduler
                .schedule_once(self.config.ending_reset_delay_ms, TaskKind::EndCleanup),
        );
        self.push_ui_all(host);
    }

    fn on_end_cleanup(&mut self, host: &mut dyn Host) {
        if self.phase.current() != MatchPhase::Ending {
            return;
        }
        self.end_cleanup_task = None;
        self.full_cleanup(host);
    }

    // === Resets ===

    /// The score/clash reset routine: despawn every carried and loose
    /// weapon, return everyone to base, then spawn fresh weapons once the
    /// world has settled. Tags and their respawn timers are left alone.
    fn reset_positions_and_weapons(&mut self, host: &mut dyn Host) {
        for actor in self.actors.values_mut() {
            if let Some(weapon) = actor.controller.combat.take_weapon() {
                host.despawn_object(weapon.object);
            }
        }
        self.powerups.despawn_loose_weapons(host);

        for actor in self.actors.values() {
            if let Some(team) = actor.team {
                host.set_position(actor.id, self.config.team_base(team));
            }
        }

        if let Some(task) = self.weapon_settle_task.take() {
            self.scheduler.cancel(task);
        }
        self.weapon_settle_task = Some(
            self.scheduler
                .schedule_once(self.config.weapon_settle_delay_ms, TaskKind::WeaponSettle),
        );
    }

    fn on_weapon_settle(&mut self, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }
        self.weapon_settle_task = None;
        for team in TeamColor::BOTH {
            self.powerups.spawn_weapon(
                team,
                self.config.weapon_spawn(team),
                self.scheduler.now(),
                host,
            );
        }
        host.broadcast("New swords have spawned!", chat_color::GREEN);
    }

    /// Cancel every task, clear every transient, reset scores and phase,
    /// and push a fresh snapshot. After this the scheduler is empty.
    fn full_cleanup(&mut self, host: &mut dyn Host) {
        log::info!("full match cleanup");
        self.powerups.reset(&mut self.scheduler, host);
        if let Some(task) = self.countdown_task.take() {
            self.scheduler.cancel(task);
        }
        for task in self.round_tasks.drain(..) {
            self.scheduler.cancel(task);
        }
        if let Some(task) = self.weapon_settle_task.take() {
            self.scheduler.cancel(task);
        }
        if let Some(task) = self.end_cleanup_task.take() {
            self.scheduler.cancel(task);
        }

        for actor in self.actors.values_mut() {
            if let Some(tag) = actor.controller.combat.tagged_state() {
                self.scheduler.cancel(tag.respawn_task);
            }
            if let Some(weapon) = actor.controller.combat.take_weapon() {
                host.despawn_object(weapon.object);
            }
            actor.controller.reset_transient();
            actor.team = None;
            host.set_position(actor.id, self.config.lobby_spawn);
        }
        self.teams.clear();

        self.red_score = 0;
        self.blue_score = 0;
        self.time_remaining_ms = self.config.round_duration_s as u64 * 1_000;
        // Nothing may outlive a full cleanup.
        self.scheduler.cancel_all();

        self.phase
            .transition(MatchPhase::AwaitingPlayers, self.scheduler.now());
        host.broadcast("Game reset! Join a team to start a new game!", chat_color::GREEN);
        self.push_event(EventKind::MatchReset);
        self.push_ui_all(host);
    }

    // === Simulation tick ===

    /// Fixed-step tick from the physics loop: run every actor's controller
    /// and apply the resulting impulses and rotations.
    pub fn simulation_tick(&mut self, dt_ms: f32, host: &mut dyn Host) {
        let now_ms = self.scheduler.now();
        for actor in self.actors.values_mut() {
            // Body already gone: nothing to drive
            let Some(velocity) = host.velocity(actor.id) else {
                continue;
            };
            let platform_velocity = actor
                .controller
                .movement
                .platform()
                .map(|platform| host.object_velocity(platform))
                .unwrap_or_else(Vector3::zeros);
            let body = BodyState {
                velocity,
                mass: host.mass(actor.id),
                platform_velocity,
            };

            let input = actor.input;
            let camera = actor.camera;
            let outcome = actor.controller.tick(&input, &camera, dt_ms, &body);

            if outcome.attack_started {
                self.events.push(MatchEvent {
                    at_ms: now_ms,
                    kind: EventKind::AttackSwung { actor: actor.id },
                });
            }
            if let Some(impulse) = outcome.output.impulse {
                host.apply_impulse(actor.id, impulse);
            }
            host.set_rotation(actor.id, outcome.output.rotation);
        }
    }

    // === Contacts ===

    /// Single entry point for all sensor callbacks from the physics side.
    pub fn handle_contact(&mut self, event: ContactEvent, host: &mut dyn Host) {
        match event {
            ContactEvent::Ground {
                actor,
                other,
                started,
            } => self.on_ground_contact(actor, other, started),
            ContactEvent::Actors {
                first,
                second,
                started,
            } => {
                if started {
                    self.on_actor_contact(first, second, host);
                }
            }
            ContactEvent::Pickup {
                actor,
                object,
                started,
            } => {
                if started {
                    self.on_pickup_contact(actor, object, host);
                }
            }
        }
    }

    fn on_ground_contact(&mut self, id: ActorId, other: ContactBody, started: bool) {
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        actor.controller.movement.ground_contact(started);
        if let ContactBody::Object {
            id: object,
            kinematic: true,
        } = other
        {
            actor.controller.movement.platform_contact(object, started);
        }
    }

    fn on_pickup_contact(&mut self, id: ActorId, object: ObjectId, host: &mut dyn Host) {
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        let name = actor.name.clone();
        let physics: &mut dyn PhysicsWorld = &mut *host;
        let result = self
            .powerups
            .handle_pickup(actor, object, &mut self.scheduler, physics);

        let now_ms = self.scheduler.now();
        match result {
            Some(PickupResult::WeaponEquipped { team }) => {
                host.broadcast(
                    &format!("{} picked up the {} team's sword!", name, team.name()),
                    team.chat_color(),
                );
                self.events.push(MatchEvent {
                    at_ms: now_ms,
                    kind: EventKind::WeaponPickedUp { actor: id, team },
                });
            }
            Some(PickupResult::SpeedBoostApplied { .. }) => {
                host.broadcast(&format!("{name} grabbed a speed boost!"), chat_color::GREEN);
                self.events.push(MatchEvent {
                    at_ms: now_ms,
                    kind: EventKind::PowerupPickedUp {
                        actor: id,
                        kind: PowerupKind::SpeedBoost,
                    },
                });
            }
            Some(PickupResult::ShieldGranted) => {
                host.broadcast(&format!("{name} grabbed a shield!"), chat_color::GREEN);
                self.events.push(MatchEvent {
                    at_ms: now_ms,
                    kind: EventKind::PowerupPickedUp {
                        actor: id,
                        kind: PowerupKind::Shield,
                    },
                });
            }
            Some(PickupResult::RejectedTagged) => {
                host.broadcast("Cannot pick up the sword while tagged!", chat_color::RED);
            }
            Some(PickupResult::RejectedOwnTeam { .. }) => {
                host.broadcast("You can only pick up the enemy team's sword!", chat_color::RED);
            }
            Some(PickupResult::AlreadyArmed) | None => {}
        }
    }

    fn on_actor_contact(&mut self, first: ActorId, second: ActorId, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }
        let now_ms = self.scheduler.now();

        let (Some(a), Some(b)) = (self.actors.get(&first), self.actors.get(&second)) else {
            return;
        };
        let (Some(team_a), Some(team_b)) = (a.team, b.team) else {
            return;
        };
        if team_a == team_b {
            return;
        }
        let (Some(pos_a), Some(pos_b)) = (host.position(first), host.position(second)) else {
            return;
        };

        let side_a = ContactSide {
            team: team_a,
            x: pos_a.x,
            tag_protected: a.controller.combat.tag_protected(now_ms),
            has_weapon: a.controller.combat.has_weapon(),
        };
        let side_b = ContactSide {
            team: team_b,
            x: pos_b.x,
            tag_protected: b.controller.combat.tag_protected(now_ms),
            has_weapon: b.controller.combat.has_weapon(),
        };

        match adjudicate(&side_a, &side_b, self.config.territory_boundary_x) {
            ContactOutcome::Ignored => {}
            ContactOutcome::ShieldAbsorbed => {
                let immunity_ms = self.powerups.config().shield_immunity_ms;
                for id in [first, second] {
                    let Some(actor) = self.actors.get_mut(&id) else {
                        continue;
                    };
                    if actor.controller.combat.has_shield() {
                        actor.controller.combat.consume_shield(now_ms, immunity_ms);
                        host.broadcast(
                            &format!("{}'s shield absorbed the tag!", actor.name),
                            chat_color::YELLOW,
                        );
                        self.events.push(MatchEvent {
                            at_ms: now_ms,
                            kind: EventKind::ShieldAbsorbedTag { actor: id },
                        });
                    }
                }
            }
            ContactOutcome::WeaponClash => {
                host.broadcast("Sword clash! Resetting positions...", chat_color::YELLOW);
                self.push_event(EventKind::WeaponClash);
                self.reset_positions_and_weapons(host);
            }
            ContactOutcome::Tagged { first_is_target } => {
                let (target, tagger) = if first_is_target {
                    (first, second)
                } else {
                    (second, first)
                };
                self.apply_tag(target, tagger, host);
            }
        }
    }

    fn apply_tag(&mut self, target_id: ActorId, tagger_id: ActorId, host: &mut dyn Host) {
        let now_ms = self.scheduler.now();
        let tagger_info = self
            .actors
            .get(&tagger_id)
            .map(|tagger| (tagger.name.clone(), tagger.team));

        let Some(target) = self.actors.get_mut(&target_id) else {
            return;
        };
        // Debounce: a freshly tagged actor is simply left alone
        if !target
            .controller
            .combat
            .can_be_tagged(now_ms, self.config.tag_debounce_ms)
        {
            return;
        }

        let respawn_task = self
            .scheduler
            .schedule_once(self.config.respawn_delay_ms, TaskKind::Respawn { actor: target_id });
        target.controller.combat.set_tagged(now_ms, respawn_task);
        target
            .controller
            .movement
            .set_permissions(MovementPermissions::none());

        let target_name = target.name.clone();
        let dropped = target.controller.combat.take_weapon();
        if let Some(weapon) = dropped {
            host.despawn_object(weapon.object);
            host.broadcast(
                &format!("{target_name} dropped their sword!"),
                chat_color::YELLOW,
            );
            self.events.push(MatchEvent {
                at_ms: now_ms,
                kind: EventKind::WeaponDropped { actor: target_id },
            });
        }

        let respawn_s = self.config.respawn_delay_ms / 1000;
        if let Some((tagger_name, tagger_team)) = tagger_info {
            host.broadcast(
                &format!(
                    "{target_name} was tagged by {tagger_name}! Respawning in {respawn_s} seconds..."
                ),
                chat_color::YELLOW,
            );
            if let Some(team) = tagger_team {
                host.broadcast(
                    &format!("{tagger_name} defended their territory!"),
                    team.chat_color(),
                );
            }
        }
        log::info!("{target_name} tagged by {tagger_id}");
        self.push_event(EventKind::Tagged {
            target: target_id,
            tagger: tagger_id,
        });
    }

    fn on_respawn(&mut self, id: ActorId, host: &mut dyn Host) {
        // Actor may have left while frozen; that is fine
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        if actor.controller.combat.clear_tag().is_none() {
            return;
        }
        actor
            .controller
            .movement
            .set_permissions(MovementPermissions::all());

        let position = match actor.team {
            Some(team) => self.config.team_base(team),
            None => self.config.lobby_spawn,
        };
        host.set_position(id, position);
        host.broadcast(&format!("{} has respawned!", actor.name), chat_color::GREEN);
        self.events.push(MatchEvent {
            at_ms: self.scheduler.now(),
            kind: EventKind::Respawned { actor: id },
        });
    }

    // === Power-up tasks ===

    fn on_powerup_spawn(&mut self, kind: PowerupKind, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() {
            return;
        }
        let now_ms = self.scheduler.now();
        let physics: &mut dyn PhysicsWorld = &mut *host;
        self.powerups
            .spawn_buff_pickup(kind, now_ms, &mut self.rng, physics);
    }

    /// A team's weapon can vanish entirely when its carrier disconnects.
    /// Put a fresh one on the pedestal if neither a loose nor a carried
    /// instance exists and no settle-spawn is already pending.
    fn on_weapon_sweep(&mut self, host: &mut dyn Host) {
        if !self.phase.current().is_round_active() || self.weapon_settle_task.is_some() {
            return;
        }
        let now_ms = self.scheduler.now();
        for team in TeamColor::BOTH {
            let carried = self.actors.values().any(|actor| {
                actor
                    .controller
                    .combat
                    .weapon()
                    .is_some_and(|weapon| weapon.team == team)
            });
            if !carried && !self.powerups.loose_weapon_exists(team) {
                let physics: &mut dyn PhysicsWorld = &mut *host;
                self.powerups
                    .spawn_weapon(team, self.config.weapon_spawn(team), now_ms, physics);
                host.broadcast(
                    &format!("The {} team's sword has returned!", team.name()),
                    team.chat_color(),
                );
            }
        }
    }

    fn on_boost_expiry(&mut self, id: ActorId) {
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        self.powerups.boost_expired(actor);
    }

    // === Snapshots ===

    fn push_event(&mut self, kind: EventKind) {
        self.events.push(MatchEvent {
            at_ms: self.scheduler.now(),
            kind,
        });
    }

    fn roster_names(&self, team: TeamColor) -> Vec<String> {
        self.teams
            .roster(team)
            .iter()
            .filter_map(|id| self.actors.get(id).map(|actor| actor.name.clone()))
            .collect()
    }

    fn build_snapshot(&self, physics: &dyn PhysicsWorld) -> UiSnapshot {
        let minimap_actors = self
            .actors
            .values()
            .filter_map(|actor| {
                let team = actor.team?;
                let position = physics.position(actor.id)?;
                Some(MinimapActor {
                    x: position.x,
                    z: position.z,
                    team,
                    has_weapon: actor.controller.combat.has_weapon(),
                })
            })
            .collect();
        let minimap_pickups = self
            .powerups
            .pickups()
            .map(|pickup| MinimapPickup {
                x: pickup.position.x,
                z: pickup.position.z,
                kind: pickup.kind,
            })
            .collect();

        UiSnapshot {
            phase: self.phase.current(),
            red_score: self.red_score,
            blue_score: self.blue_score,
            time_remaining_s: self.time_remaining_ms.div_ceil(1_000) as u32,
            red_team: self.roster_names(TeamColor::Red),
            blue_team: self.roster_names(TeamColor::Blue),
            stamina: StaminaReadout {
                current: 0.0,
                max: 0.0,
            },
            minimap_actors,
            minimap_pickups,
        }
    }

    fn push_ui_all(&mut self, host: &mut dyn Host) {
        let base = self.build_snapshot(&*host);
        for actor in self.actors.values() {
            let mut snapshot = base.clone();
            let stamina = actor.controller.movement.stamina();
            snapshot.stamina = StaminaReadout {
                current: stamina.current(),
                max: stamina.max(),
            };
            host.push_state(actor.id, &snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeHost;
    use crate::world::ObjectKind;

    /// Round start instant on the fast-start path: countdown begins when the
    /// second team fills at t=0, the first tick shortens it to 10s, and ten
    /// more ticks reach zero.
    const ROUND_START_MS: u64 = 11_000;

    fn controller() -> MatchController {
        MatchController::new(
            MatchConfig::default(),
            MovementConfig::default(),
            PowerupConfig::default(),
            7,
        )
        .expect("default config is valid")
    }

    fn join(game: &mut MatchController, host: &mut FakeHost, id: u64, team: TeamColor) -> ActorId {
        let actor = ActorId(id);
        game.actor_joined(actor, host).unwrap();
        game.request_join(actor, team, host).unwrap();
        actor
    }

    /// Two actors, one per team, fast-start countdown run to completion.
    fn start_round(game: &mut MatchController, host: &mut FakeHost) -> (ActorId, ActorId) {
        let red = join(game, host, 1, TeamColor::Red);
        let blue = join(game, host, 2, TeamColor::Blue);
        game.advance(ROUND_START_MS, host);
        assert_eq!(game.phase(), MatchPhase::InProgress);
        (red, blue)
    }

    fn loose_weapons(host: &FakeHost) -> Vec<ObjectId> {
        host.objects_where(|spec| matches!(spec.kind, ObjectKind::Weapon(_)))
    }

    fn loose_weapon_of(host: &FakeHost, team: TeamColor) -> ObjectId {
        host.objects_where(|spec| spec.kind == ObjectKind::Weapon(team))
            .first()
            .copied()
            .expect("weapon on pedestal")
    }

    #[test]
    fn test_countdown_starts_when_both_teams_populated() {
        let mut game = controller();
        let mut host = FakeHost::new();

        join(&mut game, &mut host, 1, TeamColor::Red);
        assert_eq!(game.phase(), MatchPhase::AwaitingPlayers);

        join(&mut game, &mut host, 2, TeamColor::Blue);
        assert_eq!(game.phase(), MatchPhase::Starting);
        assert!(host.broadcast_containing("Teams are ready"));
        assert_eq!(game.time_remaining_s(), 60.0);
    }

    #[test]
    fn test_fast_start_shortens_countdown() {
        let mut game = controller();
        let mut host = FakeHost::new();
        join(&mut game, &mut host, 1, TeamColor::Red);
        join(&mut game, &mut host, 2, TeamColor::Blue);

        game.advance(1_000, &mut host);
        assert_eq!(game.time_remaining_s(), 10.0);
        assert!(host.broadcast_containing("Starting early"));
    }

    #[test]
    fn test_round_starts_with_fresh_weapons() {
        let mut game = controller();
        let mut host = FakeHost::new();
        start_round(&mut game, &mut host);

        assert_eq!(game.scores(), (0, 0));
        assert_eq!(game.time_remaining_s(), 300.0);

        // One weapon per team appears after the settle delay
        assert!(loose_weapons(&host).is_empty());
        game.advance(ROUND_START_MS + 500, &mut host);
        assert_eq!(loose_weapons(&host).len(), 2);
        assert!(host.broadcast_containing("New swords have spawned"));
    }

    #[test]
    fn test_unteamed_actor_waits_out_full_countdown_then_is_assigned() {
        let mut game = controller();
        let mut host = FakeHost::new();
        join(&mut game, &mut host, 1, TeamColor::Red);
        join(&mut game, &mut host, 2, TeamColor::Blue);
        game.actor_joined(ActorId(3), &mut host).unwrap();

        // Actor 3 never picks a side, so no fast start
        game.advance(30_000, &mut host);
        assert_eq!(game.phase(), MatchPhase::Starting);

        game.advance(60_000, &mut host);
        assert_eq!(game.phase(), MatchPhase::InProgress);
        let third = game.actor(ActorId(3)).unwrap();
        assert!(third.team.is_some());
        assert!(
            game.team_count(TeamColor::Red)
                .abs_diff(game.team_count(TeamColor::Blue))
                <= 1
        );
    }

    #[test]
    fn test_join_rejected_during_round() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, _) = start_round(&mut game, &mut host);

        game.request_join(red, TeamColor::Blue, &mut host).unwrap();
        assert_eq!(game.actor(red).unwrap().team, Some(TeamColor::Red));
        assert!(host.broadcast_containing("Cannot change teams"));
    }

    #[test]
    fn test_duplicate_join_is_an_error() {
        let mut game = controller();
        let mut host = FakeHost::new();
        game.actor_joined(ActorId(1), &mut host).unwrap();
        assert_eq!(
            game.actor_joined(ActorId(1), &mut host),
            Err(EngineError::DuplicateActor(ActorId(1)))
        );
    }

    #[test]
    fn test_full_team_redirects_to_spectator() {
        let mut game = MatchController::new(
            MatchConfig {
                max_team_size: 1,
                ..Default::default()
            },
            MovementConfig::default(),
            PowerupConfig::default(),
            7,
        )
        .unwrap();
        let mut host = FakeHost::new();

        join(&mut game, &mut host, 1, TeamColor::Red);
        join(&mut game, &mut host, 2, TeamColor::Blue);
        let third = join(&mut game, &mut host, 3, TeamColor::Red);

        assert_eq!(game.actor(third).unwrap().team, None);
        assert!(host.broadcast_containing("Teams are full"));
        assert_eq!(
            host.position(third),
            Some(MatchConfig::default().spectator_position)
        );
    }

    #[test]
    fn test_scoring_increments_and_resets() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        // Red steals the blue sword
        let blue_weapon = loose_weapon_of(&host, TeamColor::Blue);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: red,
                object: blue_weapon,
                started: true,
            },
            &mut host,
        );
        assert!(game.actor(red).unwrap().controller.combat.has_weapon());

        // Carry it across the red scoring line
        host.place_actor(red, Vector3::new(4.0, 7.0, 0.0));
        game.advance(ROUND_START_MS + 600, &mut host);

        assert_eq!(game.scores(), (1, 0));
        let events = game.take_events();
        assert!(events.iter().any(|event| matches!(
            event.kind,
            EventKind::Scored {
                team: TeamColor::Red,
                ..
            }
        )));

        // Full reset: carrier disarmed, everyone back at base, fresh weapons
        // after the settle delay
        assert!(!game.actor(red).unwrap().controller.combat.has_weapon());
        assert_eq!(host.position(red), Some(MatchConfig::default().red_base));
        assert_eq!(host.position(blue), Some(MatchConfig::default().blue_base));
        assert!(loose_weapons(&host).is_empty());
        game.advance(ROUND_START_MS + 1_100, &mut host);
        assert_eq!(loose_weapons(&host).len(), 2);
    }

    #[test]
    fn test_own_weapon_pickup_is_rejected() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, _) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        let red_weapon = loose_weapon_of(&host, TeamColor::Red);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: red,
                object: red_weapon,
                started: true,
            },
            &mut host,
        );

        assert!(!game.actor(red).unwrap().controller.combat.has_weapon());
        assert!(host.broadcast_containing("enemy team's sword"));
        // The pedestal weapon stays
        assert_eq!(loose_weapons(&host).len(), 2);
    }

    #[test]
    fn test_tag_freezes_then_respawns_after_delay() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        // Blue intrudes deep into red territory
        host.place_actor(red, Vector3::new(5.0, 7.0, 0.0));
        host.place_actor(blue, Vector3::new(5.0, 7.0, 1.0));
        game.handle_contact(
            ContactEvent::Actors {
                first: red,
                second: blue,
                started: true,
            },
            &mut host,
        );

        let frozen = game.actor(blue).unwrap();
        assert!(frozen.controller.combat.is_tagged());
        assert_eq!(
            frozen.controller.movement.permissions(),
            MovementPermissions::none()
        );

        // A second contact inside the debounce window changes nothing
        game.handle_contact(
            ContactEvent::Actors {
                first: red,
                second: blue,
                started: true,
            },
            &mut host,
        );
        let tags = game
            .take_events()
            .into_iter()
            .filter(|event| matches!(event.kind, EventKind::Tagged { .. }))
            .count();
        assert_eq!(tags, 1);

        // Respawn exactly RESPAWN_DELAY later
        let tagged_at = ROUND_START_MS + 500;
        game.advance(tagged_at + 13_000, &mut host);
        let respawned = game.actor(blue).unwrap();
        assert!(!respawned.controller.combat.is_tagged());
        assert_eq!(
            respawned.controller.movement.permissions(),
            MovementPermissions::all()
        );
        assert_eq!(host.position(blue), Some(MatchConfig::default().blue_base));
    }

    #[test]
    fn test_tagged_carrier_drops_weapon() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        let red_weapon = loose_weapon_of(&host, TeamColor::Red);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: blue,
                object: red_weapon,
                started: true,
            },
            &mut host,
        );
        assert!(game.actor(blue).unwrap().controller.combat.has_weapon());

        // Carrier has a weapon, so contact is a clash, not a tag
        host.place_actor(red, Vector3::new(5.0, 7.0, 0.0));
        host.place_actor(blue, Vector3::new(5.0, 7.0, 1.0));
        game.handle_contact(
            ContactEvent::Actors {
                first: red,
                second: blue,
                started: true,
            },
            &mut host,
        );

        // Weapon clash: both reset to base, carried weapon despawned
        assert!(!game.actor(blue).unwrap().controller.combat.has_weapon());
        assert!(!game.actor(blue).unwrap().controller.combat.is_tagged());
        assert_eq!(host.position(red), Some(MatchConfig::default().red_base));
        assert!(host
            .objects_where(|spec| matches!(spec.kind, ObjectKind::CarriedWeapon(_)))
            .is_empty());
    }

    #[test]
    fn test_shield_absorbs_tag_exactly_once() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        game.actors
            .get_mut(&blue)
            .unwrap()
            .controller
            .combat
            .grant_shield();
        host.place_actor(red, Vector3::new(5.0, 7.0, 0.0));
        host.place_actor(blue, Vector3::new(5.0, 7.0, 1.0));

        let contact = ContactEvent::Actors {
            first: red,
            second: blue,
            started: true,
        };
        game.handle_contact(contact, &mut host);
        assert!(!game.actor(blue).unwrap().controller.combat.is_tagged());
        assert!(!game.actor(blue).unwrap().controller.combat.has_shield());
        assert!(host.broadcast_containing("shield absorbed"));

        // Immunity window still protects
        game.handle_contact(contact, &mut host);
        assert!(!game.actor(blue).unwrap().controller.combat.is_tagged());

        // Window over: the next contact tags
        game.advance(ROUND_START_MS + 500 + 2_000, &mut host);
        game.handle_contact(contact, &mut host);
        assert!(game.actor(blue).unwrap().controller.combat.is_tagged());
    }

    #[test]
    fn test_speed_boost_applies_refreshes_and_reverts_to_base() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, _) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        let spawn_boost = |game: &mut MatchController, host: &mut FakeHost| {
            let now_ms = game.now_ms();
            let physics: &mut dyn PhysicsWorld = &mut *host;
            game.powerups
                .spawn_buff_pickup(PowerupKind::SpeedBoost, now_ms, &mut game.rng, physics);
            host.objects_where(|spec| spec.kind == ObjectKind::Pickup(PowerupKind::SpeedBoost))
                .first()
                .copied()
                .expect("boost pickup")
        };

        // First boost at t=11_500
        let boost = spawn_boost(&mut game, &mut host);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: red,
                object: boost,
                started: true,
            },
            &mut host,
        );
        let movement = &game.actor(red).unwrap().controller.movement;
        assert!((movement.run_velocity() - 10.0).abs() < 1e-5);
        assert!((movement.walk_velocity() - 5.0).abs() < 1e-5);

        // Second boost while the first is active refreshes the expiry
        game.advance(ROUND_START_MS + 5_000, &mut host);
        let boost = spawn_boost(&mut game, &mut host);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: red,
                object: boost,
                started: true,
            },
            &mut host,
        );

        // Past the first boost's would-be expiry: still boosted
        game.advance(ROUND_START_MS + 12_000, &mut host);
        assert!((game.actor(red).unwrap().controller.movement.run_velocity() - 10.0).abs() < 1e-5);

        // Past the refreshed expiry: back to the exact base values
        game.advance(ROUND_START_MS + 16_000, &mut host);
        let movement = &game.actor(red).unwrap().controller.movement;
        assert!((movement.run_velocity() - 8.0).abs() < 1e-5);
        assert!((movement.walk_velocity() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_round_end_then_cleanup_leaves_nothing_behind() {
        let mut game = MatchController::new(
            MatchConfig {
                round_duration_s: 5,
                ..Default::default()
            },
            MovementConfig::default(),
            PowerupConfig::default(),
            7,
        )
        .unwrap();
        let mut host = FakeHost::new();
        start_round(&mut game, &mut host);

        // Clock runs out at 16s
        game.advance(ROUND_START_MS + 5_000, &mut host);
        assert_eq!(game.phase(), MatchPhase::Ending);
        assert!(host.broadcast_containing("It's a tie"));

        // Full cleanup after the ending delay
        game.advance(ROUND_START_MS + 5_000 + 10_000, &mut host);
        assert_eq!(game.phase(), MatchPhase::AwaitingPlayers);
        assert_eq!(game.pending_tasks(), 0);
        assert_eq!(game.team_count(TeamColor::Red), 0);
        assert_eq!(game.team_count(TeamColor::Blue), 0);
        assert_eq!(game.scores(), (0, 0));
        assert_eq!(host.object_count(), 0);
        assert!(game.actor(ActorId(1)).unwrap().team.is_none());

        // Stale wall-clock time changes nothing
        game.advance(1_000_000, &mut host);
        assert_eq!(game.phase(), MatchPhase::AwaitingPlayers);
        assert_eq!(game.pending_tasks(), 0);
    }

    #[test]
    fn test_last_actor_leaving_triggers_cleanup() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        game.actor_left(red, &mut host);
        assert_eq!(game.phase(), MatchPhase::InProgress);

        game.actor_left(blue, &mut host);
        assert_eq!(game.phase(), MatchPhase::AwaitingPlayers);
        assert_eq!(game.pending_tasks(), 0);
        assert_eq!(game.actor_count(), 0);
    }

    #[test]
    fn test_departed_carrier_weapon_is_reswept() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (_red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        let red_weapon = loose_weapon_of(&host, TeamColor::Red);
        game.handle_contact(
            ContactEvent::Pickup {
                actor: blue,
                object: red_weapon,
                started: true,
            },
            &mut host,
        );
        game.actor_left(blue, &mut host);

        // Red's weapon is now neither loose nor carried; the sweep restores it
        assert!(host
            .objects_where(|spec| spec.kind == ObjectKind::Weapon(TeamColor::Red))
            .is_empty());
        game.advance(ROUND_START_MS + 45_000, &mut host);
        assert!(!host
            .objects_where(|spec| spec.kind == ObjectKind::Weapon(TeamColor::Red))
            .is_empty());
    }

    #[test]
    fn test_snapshot_reaches_every_actor() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        let snapshot = host.last_snapshot_for(red).expect("snapshot pushed");
        assert_eq!(snapshot.phase, MatchPhase::InProgress);
        assert_eq!(snapshot.red_team.len(), 1);
        assert_eq!(snapshot.blue_team.len(), 1);
        assert_eq!(snapshot.stamina.max, 250.0);
        assert!(host.last_snapshot_for(blue).is_some());
    }

    #[test]
    fn test_stale_respawn_for_departed_actor_is_noop() {
        let mut game = controller();
        let mut host = FakeHost::new();
        let (red, blue) = start_round(&mut game, &mut host);
        game.advance(ROUND_START_MS + 500, &mut host);

        host.place_actor(red, Vector3::new(5.0, 7.0, 0.0));
        host.place_actor(blue, Vector3::new(5.0, 7.0, 1.0));
        game.handle_contact(
            ContactEvent::Actors {
                first: red,
                second: blue,
                started: true,
            },
            &mut host,
        );
        assert!(game.actor(blue).unwrap().controller.combat.is_tagged());

        // Leaving cancels the respawn; advancing past it must not blow up
        game.actor_left(blue, &mut host);
        game.advance(ROUND_START_MS + 500 + 13_000, &mut host);
        assert!(game.actor(blue).is_none());
    }
}
