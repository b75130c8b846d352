//! Parametric curves for the scripted ending camera
//!
//! Both curve kinds map a normalized parameter t ∈ [0, 1] onto a value and
//! are immutable once built. Parameters outside the range are clamped.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A curve sampled by a normalized parameter
pub trait ParametricCurve {
    type Output;

    fn sample(&self, t: f32) -> Self::Output;
}

/// Split a global parameter over `segments` equal pieces.
/// Returns (segment index, local parameter).
fn locate(t: f32, segments: usize) -> (usize, f32) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * segments as f32;
    let index = (scaled.floor() as usize).min(segments - 1);
    (index, scaled - index as f32)
}

/// Cubic Bézier segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl CubicBezier {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Degenerate segment that stays on one point
    pub fn fixed(point: Vec3) -> Self {
        Self::new(point, point, point, point)
    }

    pub fn point(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }
}

/// Piecewise Bézier position curve; segments share the parameter range evenly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    segments: Vec<CubicBezier>,
}

impl CurvePath {
    pub fn new(segments: Vec<CubicBezier>) -> Self {
        Self { segments }
    }

    /// A path that never moves
    pub fn fixed(point: Vec3) -> Self {
        Self::new(vec![CubicBezier::fixed(point)])
    }

    pub fn segments(&self) -> &[CubicBezier] {
        &self.segments
    }
}

impl ParametricCurve for CurvePath {
    type Output = Vec3;

    fn sample(&self, t: f32) -> Vec3 {
        if self.segments.is_empty() {
            return Vec3::ZERO;
        }
        let (index, local) = locate(t, self.segments.len());
        self.segments[index].point(local)
    }
}

/// How orientations are blended between keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngularInterpolation {
    /// Spherical linear, piecewise between neighbouring keys
    #[default]
    Slerp,
    /// Spherical quadrangle, smooth through every key
    Squad,
}

/// Orientation curve through a list of key rotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngularCurvePath {
    keys: Vec<Quat>,
    interpolation: AngularInterpolation,
}

impl AngularCurvePath {
    pub fn new(keys: Vec<Quat>, interpolation: AngularInterpolation) -> Self {
        let keys = keys.into_iter().map(Quat::normalize).collect();
        Self {
            keys,
            interpolation,
        }
    }

    pub fn keys(&self) -> &[Quat] {
        &self.keys
    }

    fn key(&self, index: isize) -> Quat {
        let last = self.keys.len() as isize - 1;
        self.keys[index.clamp(0, last) as usize]
    }
}

impl ParametricCurve for AngularCurvePath {
    type Output = Quat;

    fn sample(&self, t: f32) -> Quat {
        match self.keys.len() {
            0 => return Quat::IDENTITY,
            1 => return self.keys[0],
            _ => {}
        }

        let (index, local) = locate(t, self.keys.len() - 1);
        let i = index as isize;
        let q1 = self.key(i);
        let q2 = same_hemisphere(q1, self.key(i + 1));

        match self.interpolation {
            AngularInterpolation::Slerp => q1.slerp(q2, local),
            AngularInterpolation::Squad => {
                let q0 = same_hemisphere(q1, self.key(i - 1));
                let q3 = same_hemisphere(q2, self.key(i + 2));
                let s1 = squad_control(q0, q1, q2);
                let s2 = squad_control(q1, q2, q3);
                squad(q1, q2, s1, s2, local)
            }
        }
    }
}

fn same_hemisphere(reference: Quat, q: Quat) -> Quat {
    if reference.dot(q) < 0.0 { -q } else { q }
}

fn quat_log(q: Quat) -> Vec3 {
    let v = q.xyz();
    let sin_half = v.length();
    if sin_half < 1e-6 {
        return Vec3::ZERO;
    }
    v / sin_half * sin_half.atan2(q.w)
}

fn quat_exp(v: Vec3) -> Quat {
    let half = v.length();
    if half < 1e-6 {
        return Quat::IDENTITY;
    }
    let (s, c) = half.sin_cos();
    let axis = v / half * s;
    Quat::from_xyzw(axis.x, axis.y, axis.z, c)
}

/// Inner control rotation for the key `cur`
fn squad_control(prev: Quat, cur: Quat, next: Quat) -> Quat {
    let inv = cur.inverse();
    let to_next = quat_log(inv * next);
    let to_prev = quat_log(inv * prev);
    (cur * quat_exp(-(to_next + to_prev) / 4.0)).normalize()
}

fn squad(q1: Quat, q2: Quat, s1: Quat, s2: Quat, t: f32) -> Quat {
    let outer = q1.slerp(q2, t);
    let inner = s1.slerp(s2, t);
    outer.slerp(inner, 2.0 * t * (1.0 - t))
}

/// Linearly map `value` from [min, max] onto [0, 1], clamped.
/// A collapsed range maps everything to 0.
pub fn remap_unit(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span.abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}
