//! Power-up effect strengths, durations, and spawn cycle cadences.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupConfig {
    /// Multiplier applied to run and walk velocities (default: 1.25)
    pub speed_boost_factor: f32,
    /// How long a speed boost lasts, ms (default: 10_000)
    pub speed_boost_duration_ms: u64,
    /// Post-shield immunity window after a shield absorbs a tag, ms (default: 2_000)
    pub shield_immunity_ms: u64,

    // === Spawn cycles (active only while a round runs) ===
    /// Speed boost spawn interval, ms (default: 15_000)
    pub speed_boost_spawn_ms: u64,
    /// Shield spawn interval, ms (default: 30_000)
    pub shield_spawn_ms: u64,
    /// Interval of the sweep that re-spawns a team weapon lost to the world,
    /// e.g. when its carrier disconnects, ms (default: 45_000)
    pub weapon_sweep_ms: u64,

    /// Candidate drop points near the map center, picked at random per spawn.
    pub pickup_spawn_points: Vec<Vector3<f32>>,
}

impl Default for PowerupConfig {
    fn default() -> Self {
        Self {
            speed_boost_factor: 1.25,
            speed_boost_duration_ms: 10_000,
            shield_immunity_ms: 2_000,

            speed_boost_spawn_ms: 15_000,
            shield_spawn_ms: 30_000,
            weapon_sweep_ms: 45_000,

            pickup_spawn_points: vec![
                Vector3::new(0.0, 7.0, 0.0),
                Vector3::new(8.0, 7.0, 6.0),
                Vector3::new(-8.0, 7.0, -6.0),
                Vector3::new(12.0, 7.0, -4.0),
                Vector3::new(-12.0, 7.0, 4.0),
            ],
        }
    }
}

impl PowerupConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.speed_boost_factor <= 0.0 {
            return Err(ConfigError::NonPositiveBoostFactor(self.speed_boost_factor));
        }
        Ok(())
    }
}
