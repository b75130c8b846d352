//! Rigid-body physics collaborator
//!
//! The gameplay core never simulates dynamics itself. It talks to a physics
//! world through [`PhysicsWorld`], holding only opaque handles.

pub mod rapier;

#[cfg(test)]
pub mod mock;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use rapier::RapierWorld;

/// Opaque handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a sensor probe owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeHandle(pub u32);

/// Collision shape, centered on the body origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
    /// Upright cylinder along the Y axis
    Cylinder { half_height: f32, radius: f32 },
    Ball { radius: f32 },
}

/// How a body responds to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Immovable level geometry
    Fixed,
    /// Simulated body with gravity and contacts
    Dynamic { mass: f32, lock_rotations: bool },
    /// Immovable, reports overlaps but never pushes anything
    Trigger,
}

/// Everything needed to create a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: Shape,
    pub kind: BodyKind,
    pub translation: Vec3,
    /// Rotation about the world Y axis (degrees)
    pub yaw_degrees: f32,
}

impl BodyDesc {
    pub fn fixed(shape: Shape, translation: Vec3) -> Self {
        Self {
            shape,
            kind: BodyKind::Fixed,
            translation,
            yaw_degrees: 0.0,
        }
    }
}

/// Interface the gameplay core consumes from the physics engine.
///
/// All calls are assumed infallible within a session; unknown handles are
/// ignored (setters) or report neutral values (getters).
pub trait PhysicsWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    fn remove_body(&mut self, handle: BodyHandle);

    /// Create a non-colliding sensor with zero mass and fixed orientation
    fn add_sensor_probe(&mut self, shape: Shape) -> ProbeHandle;
    fn set_probe_translation(&mut self, probe: ProbeHandle, translation: Vec3);

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3);
    fn linear_velocity(&self, handle: BodyHandle) -> Vec3;
    fn translation(&self, handle: BodyHandle) -> Vec3;
    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3);

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Does the probe overlap any solid (non-sensor) body?
    fn probe_has_contact(&self, probe: ProbeHandle) -> bool;
    /// Are the two bodies touching or overlapping?
    fn bodies_in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool;

    fn contains_body(&self, handle: BodyHandle) -> bool;
    fn body_count(&self) -> usize;
}
