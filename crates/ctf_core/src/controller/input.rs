//! Player intent as delivered by the host each tick.

use serde::{Deserialize, Serialize};

/// Raw input flags for one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub attack: bool,
}

impl InputState {
    /// Any directional key held.
    pub fn wants_move(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Camera orientation; only yaw matters to the movement controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraOrientation {
    /// Yaw in radians, screen-relative input is rotated by this into world space.
    pub yaw: f32,
}
