//! Per-actor movement and stamina tuning.

use serde::{Deserialize, Serialize};

/// Movement controller parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Upward velocity granted on a jump (default: 10.0)
    pub jump_velocity: f32,
    /// Horizontal velocity while sprinting (default: 8.0)
    pub run_velocity: f32,
    /// Horizontal velocity while walking (default: 4.0)
    pub walk_velocity: f32,
    /// Cooldown between attacks, ms (default: 500.0)
    pub attack_cooldown_ms: f32,
    /// Attack animation window during which no new attack starts, ms (default: 300.0)
    pub attack_anim_ms: f32,
    pub stamina: StaminaConfig,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            jump_velocity: 10.0,
            run_velocity: 8.0,
            walk_velocity: 4.0,
            attack_cooldown_ms: 500.0,
            attack_anim_ms: 300.0,
            stamina: StaminaConfig::default(),
        }
    }
}

/// Sprint stamina parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaminaConfig {
    /// Gauge capacity (default: 250.0)
    pub max: f32,
    /// Drain per second while sprinting and moving (default: 30.0)
    pub drain_per_s: f32,
    /// Regen per second while not sprinting (default: 20.0)
    pub regen_per_s: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: 250.0,
            drain_per_s: 30.0,
            regen_per_s: 20.0,
        }
    }
}
