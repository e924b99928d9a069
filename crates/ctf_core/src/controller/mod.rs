//! Per-actor controller: movement and combat composed behind one tick.

pub mod combat;
pub mod input;
pub mod movement;
pub mod stamina;

use crate::config::MovementConfig;
use crate::controller::combat::CombatController;
use crate::controller::input::{CameraOrientation, InputState};
use crate::controller::movement::{BodyState, MovementController, MovementOutput};

/// One actor's controller state.
#[derive(Debug)]
pub struct ActorController {
    pub movement: MovementController,
    pub combat: CombatController,
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome {
    pub output: MovementOutput,
    /// An attack started this tick; the host may trigger swing cues.
    pub attack_started: bool,
}

impl ActorController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            movement: MovementController::new(config),
            combat: CombatController::new(config),
        }
    }

    /// Fixed-step tick: attack cooldown and trigger first, then the
    /// movement pipeline.
    pub fn tick(
        &mut self,
        input: &InputState,
        camera: &CameraOrientation,
        dt_ms: f32,
        body: &BodyState,
    ) -> TickOutcome {
        self.combat.update(dt_ms);
        let attack_started = input.attack && self.combat.try_start_attack();
        let output = self.movement.tick(input, camera, dt_ms, body);
        TickOutcome {
            output,
            attack_started,
        }
    }

    /// Clear everything a full cleanup resets: permissions, boost, stamina,
    /// weapon reference, shield, tag, cooldowns.
    pub fn reset_transient(&mut self) {
        self.movement.reset_transient();
        self.combat.reset_transient();
    }
}
