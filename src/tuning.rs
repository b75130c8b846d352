//! Game-feel tuning values
//!
//! Everything here affects how the game feels, not whether it is correct.
//! Defaults reproduce the shipped feel; a JSON file can override any subset.

use std::path::Path;
use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Radial motion ===
    /// Depth (forward/back) speed per unit of distance from the disc center
    pub depth_speed: f32,
    /// Strafe speed, constant everywhere on the disc
    pub strafe_speed: f32,
    /// Translation speed in the final level (free mode)
    pub free_move_speed: f32,

    // === Jumping ===
    /// Vertical velocity set by a jump
    pub jump_strength: f32,
    /// Minimum time between two jumps
    pub jump_cooldown_ms: u64,
    /// Distance from the player center down to the ground probe center
    pub probe_offset: f32,
    /// Half extents of the ground probe box
    pub probe_half_extents: Vec3,

    // === World ===
    /// Downward acceleration applied by the physics world
    pub gravity: f32,
    /// Furthest the player may stand from the disc center
    pub max_dist_to_center: f32,
    /// Vertical travel band is [-max_y, +max_y]
    pub max_y: f32,

    // === Camera ===
    /// World axis the camera angle is measured from (ground plane, x/z)
    pub reference_axis: Vec2,

    // === Ending ===
    /// Decay value when the ending sequence stops running
    pub decay_start: f32,
    /// Decay units removed per second
    pub decay_rate: f32,
    /// Decay never goes below this
    pub decay_floor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            depth_speed: 6.0,
            strafe_speed: 4.0,
            free_move_speed: 3.0,

            jump_strength: 6.0,
            jump_cooldown_ms: 300,
            probe_offset: 0.55,
            probe_half_extents: Vec3::new(0.3, 0.1, 0.3),

            gravity: 8.0,
            max_dist_to_center: 4.5,
            max_y: 4.0,

            reference_axis: Vec2::X,

            decay_start: 1.0,
            decay_rate: 0.25,
            decay_floor: 0.0,
        }
    }
}

impl Tuning {
    /// Jump cooldown as a duration
    pub fn jump_cooldown(&self) -> Duration {
        Duration::from_millis(self.jump_cooldown_ms)
    }

    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validated()
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validated(mut self) -> Result<Self, TuningError> {
        let non_negative = [
            ("depth_speed", self.depth_speed),
            ("strafe_speed", self.strafe_speed),
            ("free_move_speed", self.free_move_speed),
            ("jump_strength", self.jump_strength),
            ("probe_offset", self.probe_offset),
            ("gravity", self.gravity),
            ("decay_rate", self.decay_rate),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }

        for (field, value) in [("decay_start", self.decay_start), ("decay_floor", self.decay_floor)] {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite number, got {value}"),
                });
            }
        }

        let extents = self.probe_half_extents;
        if !extents.is_finite() || extents.min_element() <= 0.0 {
            return Err(TuningError::Invalid {
                field: "probe_half_extents",
                reason: format!("every extent must be positive, got {extents}"),
            });
        }

        if !(self.max_dist_to_center > 0.0) {
            return Err(TuningError::Invalid {
                field: "max_dist_to_center",
                reason: "must be positive".into(),
            });
        }
        if !(self.max_y > 0.0) {
            return Err(TuningError::Invalid {
                field: "max_y",
                reason: "must be positive".into(),
            });
        }
        if self.decay_floor > self.decay_start {
            return Err(TuningError::Invalid {
                field: "decay_floor",
                reason: format!(
                    "floor {} is above start {}",
                    self.decay_floor, self.decay_start
                ),
            });
        }

        self.reference_axis = self.reference_axis.try_normalize().ok_or(TuningError::Invalid {
            field: "reference_axis",
            reason: "must be a non-zero vector".into(),
        })?;

        Ok(self)
    }
}
