//! # ctf_core - Capture-the-Sword Match Logic Core
//!
//! Deterministic, headless game logic for a two-team objective-capture
//! minigame: steal the opposing team's sword, carry it across your scoring
//! line, avoid being tagged in enemy territory.
//!
//! The crate owns the match lifecycle state machine (lobby, countdown,
//! round, scoring, reset) and the per-actor movement/combat controllers.
//! Physics simulation, audio, rendering, and transport are external; they
//! are consumed through the narrow traits in [`world`]. All timers run on a
//! virtual-time scheduler, so hosts drive the core from their own loop and
//! tests advance time directly.

// Game controller APIs take several physics readings per call
#![allow(clippy::too_many_arguments)]

pub mod actor;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the main entry points
pub use actor::{Actor, ActorId};
pub use config::{MatchConfig, MovementConfig, PowerupConfig, StaminaConfig};
pub use controller::input::{CameraOrientation, InputState};
pub use engine::events::{ContactBody, ContactEvent, EventKind, MatchEvent};
pub use engine::{MatchController, MatchPhase, TeamColor};
pub use error::{ConfigError, EngineError, Result};
pub use world::{Host, Notifier, ObjectId, PhysicsWorld, PresentationSync};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
