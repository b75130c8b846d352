//! Render collaborator interface
//!
//! Drawing, fonts and windows belong to the host. The core only tells the
//! renderer which entities exist, how they are shaded, and where the camera is.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Shape;
use crate::sim::CameraState;

/// Stable id of a render entity, allocated by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What an entity looks like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderableKind {
    Player,
    Goal,
    Floor,
    Obstacle(Shape),
    /// Screen-space text shown for the current level
    OverlayText(String),
    /// Screen-space disc icon mirroring the world rotation
    OrientationIndicator,
}

/// An entity handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub id: EntityId,
    pub kind: RenderableKind,
    pub translation: Vec3,
    pub yaw_degrees: f32,
}

/// Shading treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shading {
    /// Unlit, used on the disc levels
    #[default]
    Flat,
    /// Lighting-capable, used in the final level
    Lit,
}

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Side-on slice through the disc
    pub const DISC_VIEW: Projection = Projection::Orthographic {
        left: -6.0,
        right: 6.0,
        bottom: -5.0,
        top: 5.0,
        near: -1.0,
        far: 1.0,
    };

    /// Free perspective used by the ending
    pub const ENDING_VIEW: Projection = Projection::Perspective {
        fov_y_degrees: 60.0,
        near: 0.1,
        far: 100.0,
    };
}

/// Shader parameter carrying the ending decay value
pub const DECAY_PARAMETER: &str = "u_decay";

/// Interface the gameplay core consumes from the render layer
pub trait Renderer {
    fn add_renderable(&mut self, renderable: &Renderable);
    fn remove_renderable(&mut self, id: EntityId);
    /// Move an existing entity (player and goal follow their bodies)
    fn set_translation(&mut self, id: EntityId, translation: Vec3);
    fn set_shading(&mut self, id: EntityId, shading: Shading);
    fn set_projection(&mut self, projection: Projection);
    fn set_camera(&mut self, camera: &CameraState);
    fn set_indicator_rotation(&mut self, degrees: f32);
    fn set_shader_parameter(&mut self, name: &str, value: f32);
}

/// Renderer that draws nothing and traces what it is told
#[derive(Debug, Default)]
pub struct LogRenderer {
    live: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities currently registered
    pub fn live_entities(&self) -> usize {
        self.live
    }
}

impl Renderer for LogRenderer {
    fn add_renderable(&mut self, renderable: &Renderable) {
        self.live += 1;
        log::debug!("add {:?} {:?} at {}", renderable.id, renderable.kind, renderable.translation);
    }

    fn remove_renderable(&mut self, id: EntityId) {
        self.live = self.live.saturating_sub(1);
        log::debug!("remove {:?}", id);
    }

    fn set_translation(&mut self, _id: EntityId, _translation: Vec3) {}

    fn set_shading(&mut self, id: EntityId, shading: Shading) {
        log::debug!("{:?} shading -> {:?}", id, shading);
    }

    fn set_projection(&mut self, projection: Projection) {
        log::debug!("projection -> {:?}", projection);
    }

    fn set_camera(&mut self, camera: &CameraState) {
        log::trace!("camera at {} yaw {:.1}", camera.position, camera.yaw);
    }

    fn set_indicator_rotation(&mut self, _degrees: f32) {}

    fn set_shader_parameter(&mut self, name: &str, value: f32) {
        log::trace!("{} = {:.3}", name, value);
    }
}
