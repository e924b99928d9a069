//! In-memory host used by unit tests across the crate.

use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};

use crate::actor::ActorId;
use crate::engine::snapshot::UiSnapshot;
use crate::world::{Notifier, ObjectId, ObjectSpec, PhysicsWorld, PresentationSync};

/// Fake physics world + notifier + presentation sink.
#[derive(Debug, Default)]
pub struct FakeHost {
    positions: HashMap<ActorId, Vector3<f32>>,
    velocities: HashMap<ActorId, Vector3<f32>>,
    rotations: HashMap<ActorId, UnitQuaternion<f32>>,
    pub impulses: Vec<(ActorId, Vector3<f32>)>,
    next_object: u64,
    pub objects: HashMap<ObjectId, ObjectSpec>,
    object_velocities: HashMap<ObjectId, Vector3<f32>>,
    pub broadcasts: Vec<(String, String)>,
    pub pushes: Vec<(ActorId, UiSnapshot)>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body for `actor` at `position`, zero velocity, unit mass.
    pub fn place_actor(&mut self, actor: ActorId, position: Vector3<f32>) {
        self.positions.insert(actor, position);
        self.velocities.insert(actor, Vector3::zeros());
    }

    pub fn remove_actor(&mut self, actor: ActorId) {
        self.positions.remove(&actor);
        self.velocities.remove(&actor);
    }

    pub fn set_velocity(&mut self, actor: ActorId, velocity: Vector3<f32>) {
        self.velocities.insert(actor, velocity);
    }

    pub fn set_object_velocity(&mut self, object: ObjectId, velocity: Vector3<f32>) {
        self.object_velocities.insert(object, velocity);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Spawned objects matching a predicate on their spec.
    pub fn objects_where(&self, predicate: impl Fn(&ObjectSpec) -> bool) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, spec)| predicate(spec))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn broadcast_containing(&self, needle: &str) -> bool {
        self.broadcasts
            .iter()
            .any(|(message, _)| message.contains(needle))
    }

    pub fn last_snapshot_for(&self, actor: ActorId) -> Option<&UiSnapshot> {
        self.pushes
            .iter()
            .rev()
            .find(|(id, _)| *id == actor)
            .map(|(_, snapshot)| snapshot)
    }
}

impl PhysicsWorld for FakeHost {
    fn position(&self, actor: ActorId) -> Option<Vector3<f32>> {
        self.positions.get(&actor).copied()
    }

    fn velocity(&self, actor: ActorId) -> Option<Vector3<f32>> {
        self.velocities.get(&actor).copied()
    }

    fn mass(&self, _actor: ActorId) -> f32 {
        1.0
    }

    fn set_position(&mut self, actor: ActorId, position: Vector3<f32>) {
        self.positions.insert(actor, position);
    }

    fn set_rotation(&mut self, actor: ActorId, rotation: UnitQuaternion<f32>) {
        self.rotations.insert(actor, rotation);
    }

    fn apply_impulse(&mut self, actor: ActorId, impulse: Vector3<f32>) {
        self.impulses.push((actor, impulse));
    }

    fn spawn_object(&mut self, spec: &ObjectSpec) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.insert(id, *spec);
        id
    }

    fn despawn_object(&mut self, object: ObjectId) {
        self.objects.remove(&object);
        self.object_velocities.remove(&object);
    }

    fn object_velocity(&self, object: ObjectId) -> Vector3<f32> {
        self.object_velocities
            .get(&object)
            .copied()
            .unwrap_or_else(Vector3::zeros)
    }
}

impl Notifier for FakeHost {
    fn broadcast(&mut self, message: &str, color: &str) {
        self.broadcasts.push((message.to_string(), color.to_string()));
    }
}

impl PresentationSync for FakeHost {
    fn push_state(&mut self, actor: ActorId, snapshot: &UiSnapshot) {
        self.pushes.push((actor, snapshot.clone()));
    }
}
