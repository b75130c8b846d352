//! Session state and core simulation types

use std::time::Duration;

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ground_xz;

/// Where the session is in the level sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Authored disc level, 1-based
    Level(u32),
    /// The final scripted level
    Terminal,
}

impl Stage {
    /// Stage for a 1-based ordinal; anything past `level_count` is terminal
    pub fn from_ordinal(ordinal: u32, level_count: u32) -> Stage {
        if (1..=level_count).contains(&ordinal) {
            Stage::Level(ordinal)
        } else {
            Stage::Terminal
        }
    }

    /// The stage reached by clearing this one
    pub fn next(self, level_count: u32) -> Stage {
        match self {
            Stage::Level(n) => Stage::from_ordinal(n + 1, level_count),
            Stage::Terminal => Stage::Terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Terminal)
    }

    pub fn motion_mode(self) -> MotionMode {
        match self {
            Stage::Level(_) => MotionMode::Radial,
            Stage::Terminal => MotionMode::Free,
        }
    }
}

/// How directional intents become velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    /// Depth walks along arcs around the disc center
    Radial,
    /// Plain camera-relative translation
    Free,
}

/// The one player of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    /// Set by the floor clamp; folded into the next ground check
    pub floor_latched: bool,
    /// Time since the last jump, saturating at the cooldown
    pub since_last_jump: Duration,
}

impl PlayerState {
    pub fn new(position: Vec3, jump_cooldown: Duration) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
            floor_latched: false,
            // A fresh player may jump immediately
            since_last_jump: jump_cooldown,
        }
    }

    /// Position on the ground plane, relative to the disc center
    pub fn ground_position(&self) -> Vec2 {
        ground_xz(self.position)
    }
}

/// Camera pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    /// Rotation about world up (degrees)
    pub yaw: f32,
    pub orientation: Quat,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::neutral()
    }
}

impl CameraState {
    /// Camera at the disc center looking down -Z
    pub fn neutral() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
        self.orientation = Quat::from_rotation_y(degrees.to_radians());
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
        let (yaw, _, _) = self.orientation.to_euler(EulerRot::YXZ);
        self.yaw = yaw.to_degrees();
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Forward projected onto the ground plane (x, z), unit length or zero
    pub fn ground_forward(&self) -> Vec2 {
        ground_xz(self.forward()).normalize_or_zero()
    }

    /// cross(forward, up) on the ground plane
    pub fn ground_right(&self) -> Vec2 {
        self.ground_forward().perp()
    }
}

/// Per-session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub jumps: u32,
    /// Seconds spent in the current stage
    pub stage_elapsed: f32,
    /// Seconds taken by each cleared level, in order
    pub level_times: Vec<f32>,
}

/// Mutable session flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub stage: Stage,
    /// False once the final goal is reached
    pub is_running: bool,
    pub paused: bool,
    /// Forward/back ignored until both are released
    pub is_depth_locked: bool,
    /// Ending fade value, meaningful once `is_running` is false
    pub decay: f32,
    pub stats: SessionStats,
}

impl SessionState {
    pub fn new(stage: Stage, decay_start: f32) -> Self {
        Self {
            stage,
            is_running: true,
            paused: false,
            is_depth_locked: false,
            decay: decay_start,
            stats: SessionStats::default(),
        }
    }

    pub fn is_final_level(&self) -> bool {
        self.stage.is_terminal()
    }
}
