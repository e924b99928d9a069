use thiserror::Error;

use crate::actor::ActorId;

/// Programmatic misuse of the engine API.
///
/// Gameplay policy rejections (joining mid-round, full teams, re-tags) are
/// not errors; they surface as notifier broadcasts or silent no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    #[error("actor already registered: {0}")]
    DuplicateActor(ActorId),
}

/// Invalid tuning values detected up front, before a match is run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("round duration must be positive, got {0}s")]
    ZeroRoundDuration(u32),

    #[error("lobby countdown must be positive, got {0}s")]
    ZeroCountdown(u32),

    #[error("red scoring threshold {red} must lie right of the blue threshold {blue}")]
    InvertedScoreZones { red: f32, blue: f32 },

    #[error("max team size must be at least 1")]
    ZeroTeamSize,

    #[error("speed boost factor must be positive, got {0}")]
    NonPositiveBoostFactor(f32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
