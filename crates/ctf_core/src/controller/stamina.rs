//! Sprint stamina gauge.
//!
//! Drains while the actor sprints and moves, regenerates otherwise, and is
//! always clamped to `[0, max]`. Sprinting is only possible while the gauge
//! is above zero.

use serde::{Deserialize, Serialize};

use crate::config::StaminaConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaminaGauge {
    current: f32,
    max: f32,
    drain_per_s: f32,
    regen_per_s: f32,
}

impl StaminaGauge {
    /// New gauge at full capacity.
    pub fn new(config: &StaminaConfig) -> Self {
        Self {
            current: config.max,
            max: config.max,
            drain_per_s: config.drain_per_s,
            regen_per_s: config.regen_per_s,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Whether the gauge still permits sprinting.
    pub fn can_sprint(&self) -> bool {
        self.current > 0.0
    }

    /// Advance the gauge by one tick.
    ///
    /// `wants_sprint` must already account for movement input: a stationary
    /// actor holding the sprint key neither drains nor blocks regen.
    pub fn update(&mut self, wants_sprint: bool, dt_s: f32) {
        if wants_sprint && self.can_sprint() {
            self.current -= self.drain_per_s * dt_s;
        } else if !wants_sprint {
            self.current += self.regen_per_s * dt_s;
        }
        self.current = self.current.clamp(0.0, self.max);
    }

    /// Back to full, used on round resets.
    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

impl Default for StaminaGauge {
    fn default() -> Self {
        Self::new(&StaminaConfig::default())
    }
}
