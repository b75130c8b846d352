//! Camera orientation controller
//!
//! On the disc levels the camera's right axis is kept on the line through the
//! disc center and the player. The world appears to turn under a player that
//! stays put on screen.

use glam::Vec2;

use super::state::CameraState;
use crate::consts::CENTER_EPSILON;

/// Camera yaw (degrees, 0..=360) for a unit radial direction `r`.
///
/// `r` is flipped onto the side `right` points to, then measured against
/// `reference_axis` with acos and unwrapped by the sign of `r.y`.
pub fn orientation_angle(r: Vec2, right: Vec2, reference_axis: Vec2) -> f32 {
    let r = if r.dot(right) < 0.0 { -r } else { r };
    let angle_x = r.dot(reference_axis).clamp(-1.0, 1.0).acos().to_degrees();
    if r.y < 0.0 {
        angle_x
    } else {
        180.0 + (180.0 - angle_x)
    }
}

/// Re-aim the camera at the player's radial line.
///
/// Returns the applied yaw, or `None` when the player stands on the center
/// and there is no line to follow.
pub fn follow(camera: &mut CameraState, player_ground: Vec2, reference_axis: Vec2) -> Option<f32> {
    if player_ground.length_squared() <= CENTER_EPSILON {
        return None;
    }
    let r = player_ground.normalize();
    let angle = orientation_angle(r, camera.ground_right(), reference_axis);
    camera.set_yaw(angle);
    Some(angle)
}
