//! rapier3d-backed physics world

use std::collections::HashMap;

use glam::Vec3;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use rapier3d::parry::query;
use rapier3d::prelude::*;

use super::{BodyDesc, BodyHandle, BodyKind, PhysicsWorld, ProbeHandle, Shape};

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Pose with a rotation about world Y only
fn yawed_pose(translation: Vec3, yaw_degrees: f32) -> Isometry3<Real> {
    Isometry3::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        UnitQuaternion::from_euler_angles(0.0, yaw_degrees.to_radians(), 0.0),
    )
}

fn shared_shape(shape: Shape) -> SharedShape {
    match shape {
        Shape::Cuboid { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        Shape::Cylinder {
            half_height,
            radius,
        } => SharedShape::cylinder(half_height, radius),
        Shape::Ball { radius } => SharedShape::ball(radius),
    }
}

/// Physics world backed by a rapier3d pipeline
pub struct RapierWorld {
    pub gravity: Vector<Real>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,

    /// Gameplay handle -> rapier body and its single collider
    bodies: HashMap<BodyHandle, (RigidBodyHandle, ColliderHandle)>,
    /// Probe handle -> parent-less sensor collider
    probes: HashMap<ProbeHandle, ColliderHandle>,
    next_id: u32,
}

impl RapierWorld {
    /// Create a world pulling everything down with `gravity` units/s²
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, -gravity, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            bodies: HashMap::new(),
            probes: HashMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn collider_of(&self, handle: BodyHandle) -> Option<&Collider> {
        self.bodies
            .get(&handle)
            .and_then(|&(_, ch)| self.collider_set.get(ch))
    }

    /// Is this collider solid level geometry a probe can stand on?
    fn is_ground_candidate(&self, collider: &Collider) -> bool {
        if collider.is_sensor() {
            return false;
        }
        // Dynamic bodies (the player) never count as ground
        collider
            .parent()
            .and_then(|h| self.rigid_body_set.get(h))
            .is_none_or(|body| !body.is_dynamic())
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Fixed | BodyKind::Trigger => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic { lock_rotations, .. } => {
                let builder = RigidBodyBuilder::dynamic().can_sleep(false);
                if lock_rotations {
                    builder.lock_rotations()
                } else {
                    builder
                }
            }
        };
        let body = builder
            .position(yawed_pose(desc.translation, desc.yaw_degrees))
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let mut collider = ColliderBuilder::new(shared_shape(desc.shape));
        match desc.kind {
            BodyKind::Fixed => {}
            BodyKind::Trigger => collider = collider.sensor(true),
            // Velocity is driven every tick; friction would only fight it
            BodyKind::Dynamic { mass, .. } => collider = collider.mass(mass).friction(0.0),
        }
        let collider_handle = self.collider_set.insert_with_parent(
            collider.build(),
            body_handle,
            &mut self.rigid_body_set,
        );

        let handle = BodyHandle(self.allocate_id());
        self.bodies.insert(handle, (body_handle, collider_handle));
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        if let Some((body_handle, _)) = self.bodies.remove(&handle) {
            self.rigid_body_set.remove(
                body_handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            );
        }
    }

    fn add_sensor_probe(&mut self, shape: Shape) -> ProbeHandle {
        let collider = ColliderBuilder::new(shared_shape(shape))
            .sensor(true)
            .density(0.0)
            .build();
        let collider_handle = self.collider_set.insert(collider);
        let handle = ProbeHandle(self.allocate_id());
        self.probes.insert(handle, collider_handle);
        handle
    }

    fn set_probe_translation(&mut self, probe: ProbeHandle, translation: Vec3) {
        if let Some(&ch) = self.probes.get(&probe) {
            if let Some(collider) = self.collider_set.get_mut(ch) {
                collider.set_translation(to_vector(translation));
            }
        }
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(&(bh, _)) = self.bodies.get(&handle) {
            if let Some(body) = self.rigid_body_set.get_mut(bh) {
                if body.is_dynamic() {
                    body.set_linvel(to_vector(velocity), true);
                }
            }
        }
    }

    fn linear_velocity(&self, handle: BodyHandle) -> Vec3 {
        self.bodies
            .get(&handle)
            .and_then(|&(bh, _)| self.rigid_body_set.get(bh))
            .map(|body| from_vector(body.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    fn translation(&self, handle: BodyHandle) -> Vec3 {
        self.bodies
            .get(&handle)
            .and_then(|&(bh, _)| self.rigid_body_set.get(bh))
            .map(|body| from_vector(body.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(&(bh, _)) = self.bodies.get(&handle) {
            if let Some(body) = self.rigid_body_set.get_mut(bh) {
                body.set_translation(to_vector(translation), true);
            }
        }
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn probe_has_contact(&self, probe: ProbeHandle) -> bool {
        let Some(probe_collider) = self.probes.get(&probe).and_then(|&ch| self.collider_set.get(ch))
        else {
            return false;
        };

        // Tested pairwise against the live collider set, so bodies added or
        // removed since the last step are seen immediately.
        self.collider_set
            .iter()
            .filter(|(_, other)| self.is_ground_candidate(other))
            .any(|(_, other)| {
                query::intersection_test(
                    probe_collider.position(),
                    probe_collider.shape(),
                    other.position(),
                    other.shape(),
                )
                .unwrap_or(false)
            })
    }

    fn bodies_in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(&(_, ca)), Some(&(_, cb))) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return false;
        };

        let touching = self
            .narrow_phase
            .contact_pair(ca, cb)
            .is_some_and(|pair| pair.has_any_active_contact);
        if touching {
            return true;
        }

        match (self.collider_of(a), self.collider_of(b)) {
            (Some(col_a), Some(col_b)) => query::intersection_test(
                col_a.position(),
                col_a.shape(),
                col_b.position(),
                col_b.shape(),
            )
            .unwrap_or(false),
            _ => false,
        }
    }

    fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
