//! Ending sequence driver
//!
//! In the final level the camera is not physics-driven: it is a pure function
//! of how far the player has walked along x. Touching the last goal stops the
//! run and starts the decay fade.

use super::curve::{AngularCurvePath, CurvePath, ParametricCurve, remap_unit};
use super::state::{CameraState, SessionState};
use crate::Tuning;
use crate::levels::FinalLevelDef;

/// What the ending did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndingFrame {
    /// Camera placed at curve parameter `t`
    Scripted { t: f32 },
    /// Run over; decay value to publish
    Decaying { decay: f32 },
}

/// Camera script for the final level
#[derive(Debug, Clone, PartialEq)]
pub struct EndingSequence {
    camera_path: CurvePath,
    camera_angles: AngularCurvePath,
    scene_min_x: f32,
    scene_max_x: f32,
}

impl EndingSequence {
    pub fn new(def: &FinalLevelDef) -> Self {
        Self {
            camera_path: def.camera_path.clone(),
            camera_angles: def.camera_angles.clone(),
            scene_min_x: def.scene_min_x,
            scene_max_x: def.scene_max_x,
        }
    }

    /// Curve parameter for a player x position
    pub fn parameter(&self, player_x: f32) -> f32 {
        remap_unit(player_x, self.scene_min_x, self.scene_max_x)
    }

    /// Place the camera for a player x position
    pub fn place_camera(&self, camera: &mut CameraState, player_x: f32) -> f32 {
        let t = self.parameter(player_x);
        camera.position = self.camera_path.sample(t);
        camera.set_orientation(self.camera_angles.sample(t));
        t
    }

    /// Advance one tick: script the camera while running, fade once stopped
    pub fn tick(
        &self,
        session: &mut SessionState,
        camera: &mut CameraState,
        player_x: f32,
        dt: f32,
        tuning: &Tuning,
    ) -> EndingFrame {
        if session.is_running {
            let t = self.place_camera(camera, player_x);
            EndingFrame::Scripted { t }
        } else {
            session.decay = decay_step(session.decay, tuning.decay_rate, dt, tuning.decay_floor);
            EndingFrame::Decaying {
                decay: session.decay,
            }
        }
    }
}

/// Stop the run and reset the fade to `decay_start`.
/// The ending tick that follows in the same step applies the first decay.
pub fn finish(session: &mut SessionState, tuning: &Tuning) {
    if session.is_running {
        session.is_running = false;
        session.decay = tuning.decay_start;
        log::info!(
            "Ending reached after {} ticks, {} jumps",
            session.stats.ticks,
            session.stats.jumps
        );
    }
}

/// Linear decay toward `floor`
pub fn decay_step(decay: f32, rate: f32, dt: f32, floor: f32) -> f32 {
    (decay - rate * dt).max(floor)
}
