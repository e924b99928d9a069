//! Tuning configuration for the match core.
//!
//! One struct per concern, defaults carry the shipped constants. All structs
//! are serde round-trippable so a host can load overrides from JSON.

pub mod match_config;
pub mod movement_config;
pub mod powerup_config;

pub use match_config::MatchConfig;
pub use movement_config::{MovementConfig, StaminaConfig};
pub use powerup_config::PowerupConfig;
