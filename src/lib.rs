//! Disc Walker - gameplay core for a rotating-disc platformer
//!
//! Core modules:
//! - `sim`: Per-tick gameplay (radial motion, jumping, clamping, camera, levels, ending)
//! - `physics`: Rigid-body collaborator interface plus a rapier3d adapter
//! - `render`: Render/input collaborator interface
//! - `levels`: Authored level content
//! - `tuning`: Data-driven game feel

pub mod levels;
pub mod physics;
pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Squared distance below which the player counts as standing on the disc center
    pub const CENTER_EPSILON: f32 = 0.01;

    /// Disc (world floor) geometry
    pub const ARENA_RADIUS: f32 = 5.0;
    pub const FLOOR_CENTER_Y: f32 = -5.0;
    pub const FLOOR_HALF_HEIGHT: f32 = 0.5;
    /// Top surface of the floor
    pub const FLOOR_TOP_Y: f32 = FLOOR_CENTER_Y + FLOOR_HALF_HEIGHT;

    /// Player cylinder
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_HALF_HEIGHT: f32 = 0.5;
    pub const PLAYER_MASS: f32 = 1.0;

    /// Goal cube half extent
    pub const GOAL_HALF_EXTENT: f32 = 0.4;
}

/// Horizontal (ground plane) part of a world position, as (x, z)
#[inline]
pub fn ground_xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a ground-plane (x, z) vector back into 3D at the given height
#[inline]
pub fn from_ground_xz(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// Convert polar (r, theta) to cartesian ground coordinates (x, z)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
