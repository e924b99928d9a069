//! External collaborator interfaces.
//!
//! The match core never simulates physics, plays audio, or renders UI; it
//! talks to those systems through the narrow traits below. Hosts implement
//! them against the real engine, tests implement them in memory.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::engine::powerup::PowerupKind;
use crate::engine::snapshot::UiSnapshot;
use crate::engine::team::TeamColor;

/// Handle to a world object (weapon, pickup, platform) owned by the physics side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// What a spawned world object represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A team's weapon lying in the world, pickable by the opposing team.
    Weapon(TeamColor),
    /// A weapon attached to a carrier's hand.
    CarriedWeapon(TeamColor),
    /// A transient pickup.
    Pickup(PowerupKind),
}

/// Spawn request handed to the physics world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSpec {
    pub kind: ObjectKind,
    pub position: Vector3<f32>,
    /// Sensor radius for pickup detection; `None` spawns a plain body.
    pub sensor_radius: Option<f32>,
    /// Attach to this actor instead of dropping into the world.
    pub attached_to: Option<ActorId>,
}

impl ObjectSpec {
    pub fn loose_weapon(team: TeamColor, position: Vector3<f32>) -> Self {
        Self {
            kind: ObjectKind::Weapon(team),
            position,
            sensor_radius: Some(1.0),
            attached_to: None,
        }
    }

    pub fn carried_weapon(team: TeamColor, carrier: ActorId) -> Self {
        Self {
            kind: ObjectKind::CarriedWeapon(team),
            position: Vector3::zeros(),
            sensor_radius: None,
            attached_to: Some(carrier),
        }
    }

    pub fn pickup(kind: PowerupKind, position: Vector3<f32>) -> Self {
        Self {
            kind: ObjectKind::Pickup(kind),
            position,
            sensor_radius: Some(1.0),
            attached_to: None,
        }
    }
}

/// Physics/collision system, consumed but never reimplemented here.
///
/// Position queries return `None` for actors the world no longer knows,
/// which callers treat as "nothing to do".
pub trait PhysicsWorld {
    fn position(&self, actor: ActorId) -> Option<Vector3<f32>>;
    fn velocity(&self, actor: ActorId) -> Option<Vector3<f32>>;
    fn mass(&self, actor: ActorId) -> f32;

    fn set_position(&mut self, actor: ActorId, position: Vector3<f32>);
    fn set_rotation(&mut self, actor: ActorId, rotation: UnitQuaternion<f32>);
    fn apply_impulse(&mut self, actor: ActorId, impulse: Vector3<f32>);

    fn spawn_object(&mut self, spec: &ObjectSpec) -> ObjectId;
    fn despawn_object(&mut self, object: ObjectId);
    /// Linear velocity of a world object; used to let riders inherit platform motion.
    fn object_velocity(&self, object: ObjectId) -> Vector3<f32>;
}

/// Fire-and-forget chat broadcast. No delivery guarantee.
pub trait Notifier {
    fn broadcast(&mut self, message: &str, color: &str);
}

/// Chat color tags understood by the session transport.
pub mod chat_color {
    pub const RED: &str = "FF0000";
    pub const BLUE: &str = "0000FF";
    pub const GREEN: &str = "00FF00";
    pub const YELLOW: &str = "FFFF00";
}

/// Per-actor UI state push.
pub trait PresentationSync {
    fn push_state(&mut self, actor: ActorId, snapshot: &UiSnapshot);
}

/// Everything the match core needs from its host, bundled.
pub trait Host: PhysicsWorld + Notifier + PresentationSync {}

impl<T: PhysicsWorld + Notifier + PresentationSync> Host for T {}
