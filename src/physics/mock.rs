//! Scripted physics world for unit tests
//!
//! Bodies integrate their velocity with no gravity and no contact response.
//! Contacts are whatever the test says they are.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use super::{BodyDesc, BodyHandle, PhysicsWorld, ProbeHandle, Shape};

#[derive(Debug, Clone)]
pub struct MockBody {
    pub desc: BodyDesc,
    pub translation: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Default)]
pub struct MockWorld {
    pub bodies: HashMap<BodyHandle, MockBody>,
    pub probes: HashMap<ProbeHandle, (Shape, Vec3)>,
    /// Answer for every probe query
    pub probe_contact: bool,
    /// Pairs reported as touching, stored (min, max)
    pub contacts: HashSet<(BodyHandle, BodyHandle)>,
    pub steps: u32,
    /// Every handle ever removed, in order
    pub removed: Vec<BodyHandle>,
    next_id: u32,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, a: BodyHandle, b: BodyHandle) {
        self.contacts.insert((a.min(b), a.max(b)));
    }

    pub fn untouch_all(&mut self) {
        self.contacts.clear();
    }

    pub fn probe_translation(&self, probe: ProbeHandle) -> Option<Vec3> {
        self.probes.get(&probe).map(|(_, t)| *t)
    }
}

impl PhysicsWorld for MockWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.bodies.insert(
            handle,
            MockBody {
                desc: *desc,
                translation: desc.translation,
                velocity: Vec3::ZERO,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        if self.bodies.remove(&handle).is_some() {
            self.removed.push(handle);
            self.contacts.retain(|&(a, b)| a != handle && b != handle);
        }
    }

    fn add_sensor_probe(&mut self, shape: Shape) -> ProbeHandle {
        self.next_id += 1;
        let handle = ProbeHandle(self.next_id);
        self.probes.insert(handle, (shape, Vec3::ZERO));
        handle
    }

    fn set_probe_translation(&mut self, probe: ProbeHandle, translation: Vec3) {
        if let Some(entry) = self.probes.get_mut(&probe) {
            entry.1 = translation;
        }
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn linear_velocity(&self, handle: BodyHandle) -> Vec3 {
        self.bodies.get(&handle).map_or(Vec3::ZERO, |b| b.velocity)
    }

    fn translation(&self, handle: BodyHandle) -> Vec3 {
        self.bodies.get(&handle).map_or(Vec3::ZERO, |b| b.translation)
    }

    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.translation = translation;
        }
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for body in self.bodies.values_mut() {
            body.translation += body.velocity * dt;
        }
    }

    fn probe_has_contact(&self, _probe: ProbeHandle) -> bool {
        self.probe_contact
    }

    fn bodies_in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.contacts.contains(&(a.min(b), a.max(b)))
    }

    fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
