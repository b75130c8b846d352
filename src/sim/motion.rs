//! Motion resolver
//!
//! Turns directional intents into the player's horizontal velocity. On the
//! disc levels "depth" input walks along the circle the player already stands
//! on, which is what lets a rotating disc read as flat ground.

use glam::Vec2;

use super::state::MotionMode;
use crate::Tuning;
use crate::consts::CENTER_EPSILON;

/// Directional intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntents {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
}

impl MoveIntents {
    pub fn depth_active(&self) -> bool {
        self.forward || self.back
    }

    /// Same intents with forward/back dropped
    pub fn without_depth(self) -> Self {
        Self {
            forward: false,
            back: false,
            ..self
        }
    }
}

/// Rescale `v` to `length`; a zero vector stays zero
#[inline]
pub fn rescale(v: Vec2, length: f32) -> Vec2 {
    v.try_normalize().map_or(Vec2::ZERO, |dir| dir * length)
}

/// Horizontal velocity (x, z) for this tick.
///
/// `pos` is the player's ground position relative to the disc center and
/// `front` the camera forward projected onto the ground.
pub fn resolve(
    mode: MotionMode,
    pos: Vec2,
    front: Vec2,
    intents: MoveIntents,
    dt: f32,
    tuning: &Tuning,
) -> Vec2 {
    match mode {
        MotionMode::Radial => resolve_radial(pos, front, intents, dt, tuning),
        MotionMode::Free => resolve_free(front, intents, tuning),
    }
}

fn resolve_radial(pos: Vec2, front: Vec2, intents: MoveIntents, dt: f32, tuning: &Tuning) -> Vec2 {
    let right = front.perp();
    let mut velocity = Vec2::ZERO;

    // At the center there is no circle to walk along; only strafing applies
    if pos.length_squared() > CENTER_EPSILON {
        velocity += radial_depth(pos, front, intents, dt, tuning.depth_speed);
    }

    if intents.strafe_left {
        velocity -= right * tuning.strafe_speed;
    }
    if intents.strafe_right {
        velocity += right * tuning.strafe_speed;
    }
    velocity
}

/// Depth velocity that keeps the player on the circle of its current radius.
///
/// Speed scales with the radius so the angular speed is the same everywhere.
/// The straight-line step is projected back onto the circle and the
/// resulting chord is rescaled to the original speed.
pub fn radial_depth(pos: Vec2, front: Vec2, intents: MoveIntents, dt: f32, depth_speed: f32) -> Vec2 {
    let dist_to_mid = pos.length();

    let mut depth = Vec2::ZERO;
    if intents.forward {
        depth += front * dist_to_mid * depth_speed;
    }
    if intents.back {
        depth -= front * dist_to_mid * depth_speed;
    }
    if !intents.depth_active() {
        return depth;
    }

    let speed = depth.length();
    let predicted = rescale(pos + depth * dt, dist_to_mid);
    if predicted == Vec2::ZERO {
        return Vec2::ZERO;
    }
    rescale(predicted - pos, speed)
}

fn resolve_free(front: Vec2, intents: MoveIntents, tuning: &Tuning) -> Vec2 {
    let right = front.perp();
    let speed = tuning.free_move_speed;
    let mut velocity = Vec2::ZERO;

    if intents.forward {
        velocity += front * speed;
    }
    if intents.back {
        velocity -= front * speed;
    }
    if intents.strafe_left {
        velocity -= right * speed;
    }
    if intents.strafe_right {
        velocity += right * speed;
    }
    velocity
}
