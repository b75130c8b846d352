//! Boundary clamp
//!
//! Runs after the physics step and pulls the player back inside the disc and
//! the vertical travel band.

use glam::{Vec2, Vec3};

use super::state::PlayerState;
use crate::Tuning;
use crate::{from_ground_xz, ground_xz};

/// Relative slack on the radius test so a clamped position is never re-clamped
const RADIUS_SLACK: f32 = 1e-5;

/// Result of clamping a position/velocity pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub position: Vec3,
    pub velocity: Vec3,
    pub hit_edge: bool,
    pub hit_ceiling: bool,
    pub hit_floor: bool,
}

impl Clamped {
    pub fn changed(&self) -> bool {
        self.hit_edge || self.hit_ceiling || self.hit_floor
    }
}

/// Clamp to the disc radius and to [-max_y, +max_y]
pub fn clamp(position: Vec3, velocity: Vec3, max_dist_to_center: f32, max_y: f32) -> Clamped {
    let mut out = Clamped {
        position,
        velocity,
        hit_edge: false,
        hit_ceiling: false,
        hit_floor: false,
    };

    let ground: Vec2 = ground_xz(position);
    let limit_sq = max_dist_to_center * max_dist_to_center;
    if ground.length_squared() > limit_sq * (1.0 + RADIUS_SLACK) {
        let edge = ground.normalize_or_zero() * max_dist_to_center;
        out.position = from_ground_xz(edge, position.y);
        out.hit_edge = true;
    }

    if position.y >= max_y {
        out.position.y = max_y;
        out.velocity.y = 0.0;
        out.hit_ceiling = true;
    } else if position.y <= -max_y {
        out.position.y = -max_y;
        out.velocity.y = 0.0;
        out.hit_floor = true;
    }

    out
}

/// Clamp the player in place. Touching the floor bound grounds the player.
pub fn apply(player: &mut PlayerState, tuning: &Tuning) -> Clamped {
    let out = clamp(
        player.position,
        player.velocity,
        tuning.max_dist_to_center,
        tuning.max_y,
    );
    player.position = out.position;
    player.velocity = out.velocity;
    if out.hit_floor {
        player.on_ground = true;
        player.floor_latched = true;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_pulls_back_onto_disc_edge() {
        let out = clamp(Vec3::new(6.0, 0.0, 8.0), Vec3::ONE, 5.0, 4.0);
        assert!(out.hit_edge);
        assert!((ground_xz(out.position).length() - 5.0).abs() < 1e-5);
        assert!((out.position - Vec3::new(3.0, 0.0, 4.0)).length() < 1e-5);
        assert_eq!(out.velocity, Vec3::ONE);
    }

    #[test]
    fn test_inside_is_untouched() {
        let out = clamp(Vec3::new(1.0, -1.0, 1.0), Vec3::new(0.0, -3.0, 0.0), 5.0, 4.0);
        assert!(!out.changed());
        assert_eq!(out.position, Vec3::new(1.0, -1.0, 1.0));
    }

    #[test]
    fn test_ceiling_zeroes_vertical_velocity() {
        let out = clamp(Vec3::new(0.0, 4.5, 0.0), Vec3::new(1.0, 3.0, 0.0), 5.0, 4.0);
        assert!(out.hit_ceiling);
        assert_eq!(out.position.y, 4.0);
        assert_eq!(out.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_floor_latches_ground_without_probe() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(Vec3::new(0.0, -tuning.max_y - 0.3, 0.0), Duration::ZERO);
        player.velocity = Vec3::new(0.0, -2.0, 0.0);
        player.on_ground = false;

        let out = apply(&mut player, &tuning);
        assert!(out.hit_floor);
        assert!(player.on_ground);
        assert!(player.floor_latched);
        assert_eq!(player.position.y, -tuning.max_y);
        assert_eq!(player.velocity.y, 0.0);
    }

    proptest! {
        #[test]
        fn prop_clamp_is_idempotent(
            x in -20.0f32..20.0,
            y in -20.0f32..20.0,
            z in -20.0f32..20.0,
            vy in -10.0f32..10.0,
        ) {
            let once = clamp(Vec3::new(x, y, z), Vec3::new(0.0, vy, 0.0), 4.5, 4.0);
            let twice = clamp(once.position, once.velocity, 4.5, 4.0);
            prop_assert_eq!(once.position, twice.position);
            prop_assert_eq!(once.velocity, twice.velocity);
        }
    }
}
