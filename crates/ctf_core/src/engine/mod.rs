//! Match-wide orchestration: lifecycle state machine, teams, scoring,
//! power-ups, and the scheduler that drives every timer.

pub mod events;
pub mod match_controller;
pub mod phase;
pub mod powerup;
pub mod scheduler;
pub mod score;
pub mod snapshot;
pub mod team;

pub use match_controller::{MatchController, TaskKind};
pub use phase::{MatchPhase, PhaseMachine};
pub use scheduler::{TaskId, TaskScheduler};
pub use team::{JoinOutcome, TeamColor, TeamManager};
