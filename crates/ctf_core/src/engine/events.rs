//! Inbound contact events and outbound match events.
//!
//! The physics side reports sensor callbacks as `ContactEvent` values fed to
//! a single dispatch entry point; the match core emits `MatchEvent`s for
//! hosts that drive audio, animation, or analytics off discrete moments.
//! Both directions are plain data so the single-threaded mutation model
//! stays visible.

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::engine::powerup::PowerupKind;
use crate::engine::team::TeamColor;
use crate::world::ObjectId;

/// The other body in a sensor contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactBody {
    /// Terrain.
    Block,
    Actor(ActorId),
    Object { id: ObjectId, kinematic: bool },
}

/// A sensor collision callback, translated to data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Ground sensor under an actor entered/left another body.
    Ground {
        actor: ActorId,
        other: ContactBody,
        started: bool,
    },
    /// Two actor bodies touched.
    Actors {
        first: ActorId,
        second: ActorId,
        started: bool,
    },
    /// An actor entered a pickup's sensor volume.
    Pickup {
        actor: ActorId,
        object: ObjectId,
        started: bool,
    },
}

/// Discrete moment the host may react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    CountdownStarted,
    RoundStarted,
    Scored {
        team: TeamColor,
        carrier: ActorId,
    },
    Tagged {
        target: ActorId,
        tagger: ActorId,
    },
    Respawned {
        actor: ActorId,
    },
    WeaponPickedUp {
        actor: ActorId,
        team: TeamColor,
    },
    WeaponDropped {
        actor: ActorId,
    },
    WeaponClash,
    PowerupPickedUp {
        actor: ActorId,
        kind: PowerupKind,
    },
    ShieldAbsorbedTag {
        actor: ActorId,
    },
    AttackSwung {
        actor: ActorId,
    },
    RoundEnded {
        winner: Option<TeamColor>,
    },
    MatchReset,
}

/// Timestamped outbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}
