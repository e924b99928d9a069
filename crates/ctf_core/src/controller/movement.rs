//! Per-tick movement controller.
//!
//! Converts input flags and camera yaw into a target velocity, derives a
//! mass-scaled impulse against the body's current velocity, and sets facing
//! rotation straight from yaw. Grounding comes from a sensor contact
//! counter, not a velocity heuristic, so stacked ground contacts behave.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;
use crate::controller::input::{CameraOrientation, InputState};
use crate::controller::stamina::StaminaGauge;
use crate::world::ObjectId;

/// Jump is only granted while vertical velocity sits in this band around
/// zero; outside it the actor is mid-launch or falling.
const JUMP_VY_MIN: f32 = -0.001;
const JUMP_VY_MAX: f32 = 3.0;

/// Movement abilities toggled by the combat side (tags) and read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementPermissions {
    pub walk: bool,
    pub run: bool,
    pub jump: bool,
}

impl MovementPermissions {
    pub fn all() -> Self {
        Self {
            walk: true,
            run: true,
            jump: true,
        }
    }

    pub fn none() -> Self {
        Self {
            walk: false,
            run: false,
            jump: false,
        }
    }
}

impl Default for MovementPermissions {
    fn default() -> Self {
        Self::all()
    }
}

/// Physics readings for one tick, queried by the caller.
#[derive(Debug, Clone, Copy)]
pub struct BodyState {
    pub velocity: Vector3<f32>,
    pub mass: f32,
    pub platform_velocity: Vector3<f32>,
}

/// What the tick wants applied to the body.
#[derive(Debug, Clone, Copy)]
pub struct MovementOutput {
    pub impulse: Option<Vector3<f32>>,
    pub rotation: UnitQuaternion<f32>,
}

#[derive(Debug)]
pub struct MovementController {
    jump_velocity: f32,
    base_run_velocity: f32,
    base_walk_velocity: f32,
    speed_multiplier: f32,
    permissions: MovementPermissions,
    stamina: StaminaGauge,
    ground_contacts: u32,
    platform: Option<ObjectId>,
}

impl MovementController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            jump_velocity: config.jump_velocity,
            base_run_velocity: config.run_velocity,
            base_walk_velocity: config.walk_velocity,
            speed_multiplier: 1.0,
            permissions: MovementPermissions::all(),
            stamina: StaminaGauge::new(&config.stamina),
            ground_contacts: 0,
            platform: None,
        }
    }

    // === Grounding & platform, fed by sensor contacts ===

    pub fn is_grounded(&self) -> bool {
        self.ground_contacts > 0
    }

    /// Ground sensor contact started/ended. The counter never drops below
    /// zero even if the physics side delivers an unpaired end.
    pub fn ground_contact(&mut self, started: bool) {
        if started {
            self.ground_contacts += 1;
        } else {
            self.ground_contacts = self.ground_contacts.saturating_sub(1);
        }
    }

    /// Kinematic body under the ground sensor; riders inherit its velocity.
    pub fn platform_contact(&mut self, object: ObjectId, started: bool) {
        if started {
            self.platform = Some(object);
        } else if self.platform == Some(object) {
            self.platform = None;
        }
    }

    pub fn platform(&self) -> Option<ObjectId> {
        self.platform
    }

    // === Permissions & speed modifiers ===

    pub fn permissions(&self) -> MovementPermissions {
        self.permissions
    }

    pub fn set_permissions(&mut self, permissions: MovementPermissions) {
        self.permissions = permissions;
    }

    /// Effective velocities; boosted while a speed multiplier is active.
    pub fn run_velocity(&self) -> f32 {
        self.base_run_velocity * self.speed_multiplier
    }

    pub fn walk_velocity(&self) -> f32 {
        self.base_walk_velocity * self.speed_multiplier
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_multiplier != 1.0
    }

    /// Apply a speed boost. The base velocities are never overwritten, so
    /// clearing always lands back on them no matter how many boosts were
    /// picked up in between.
    pub fn set_speed_multiplier(&mut self, factor: f32) {
        self.speed_multiplier = factor;
    }

    pub fn clear_speed_multiplier(&mut self) {
        self.speed_multiplier = 1.0;
    }

    pub fn stamina(&self) -> &StaminaGauge {
        &self.stamina
    }

    /// Full permissions, no boost, full stamina. Grounding state is
    /// physical and survives a reset.
    pub fn reset_transient(&mut self) {
        self.permissions = MovementPermissions::all();
        self.speed_multiplier = 1.0;
        self.stamina.refill();
    }

    // === The per-tick contract ===

    pub fn tick(
        &mut self,
        input: &InputState,
        camera: &CameraOrientation,
        dt_ms: f32,
        body: &BodyState,
    ) -> MovementOutput {
        let dt_s = dt_ms / 1000.0;

        // Stamina first: drain gated on actual movement, regen on released
        // sprint. Sprinting itself only needs the key plus a non-empty gauge.
        let wants_sprint = input.sprint && input.wants_move();
        self.stamina.update(wants_sprint, dt_s);
        let sprinting = input.sprint && self.stamina.can_sprint();

        let mut target: Vector3<f32> = Vector3::zeros();

        // Horizontal: screen-relative flags rotated by yaw into world space.
        let speed = if sprinting {
            self.run_velocity()
        } else {
            self.walk_velocity()
        };
        let allowed = if sprinting {
            self.permissions.run
        } else {
            self.permissions.walk
        };
        if allowed {
            let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
            if input.forward {
                target.x -= speed * sin_yaw;
                target.z -= speed * cos_yaw;
            }
            if input.backward {
                target.x += speed * sin_yaw;
                target.z += speed * cos_yaw;
            }
            if input.left {
                target.x -= speed * cos_yaw;
                target.z += speed * sin_yaw;
            }
            if input.right {
                target.x += speed * cos_yaw;
                target.z -= speed * sin_yaw;
            }

            // Diagonals must not outrun the chosen speed.
            let horizontal = (target.x * target.x + target.z * target.z).sqrt();
            if horizontal > speed {
                let factor = speed / horizontal;
                target.x *= factor;
                target.z *= factor;
            }
        }

        // Vertical: grounded jumps only, and only while vertical velocity is
        // near zero so a mid-air or just-launched actor cannot double jump.
        if input.jump
            && self.permissions.jump
            && self.is_grounded()
            && body.velocity.y > JUMP_VY_MIN
            && body.velocity.y <= JUMP_VY_MAX
        {
            target.y = self.jump_velocity;
        }

        // Impulse toward the target, inheriting platform motion. Skipped
        // while the body carries an external velocity (knockback, launch)
        // that the delta would otherwise cancel.
        let delta = Vector3::new(
            target.x - body.velocity.x + body.platform_velocity.x,
            target.y + body.platform_velocity.y,
            target.z - body.velocity.z + body.platform_velocity.z,
        );
        let has_external_velocity = body.velocity.x.abs() > self.base_run_velocity
            || body.velocity.y.abs() > self.jump_velocity
            || body.velocity.z.abs() > self.base_run_velocity;

        let impulse = if !has_external_velocity && delta != Vector3::zeros() {
            Some(delta * body.mass)
        } else {
            None
        };

        MovementOutput {
            impulse,
            rotation: UnitQuaternion::from_axis_angle(&Vector3::y_axis(), camera.yaw),
        }
    }
}
