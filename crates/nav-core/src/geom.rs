//! Geometry aliases and the handful of planar helpers steering needs.
//!
//! Points and vectors are `nalgebra` single-precision types.  Steering is
//! *planar*: agents walk on the ground, so arrival and heading are measured
//! in the XY plane and height differences between waypoints are ignored.

use nalgebra as na;

pub type Point3 = na::Point3<f32>;
pub type Vector3 = na::Vector3<f32>;

/// Below this length a planar delta has no meaningful direction.
pub const DIR_EPS: f32 = 1.0e-5;

/// `to - from` with the vertical component dropped.
#[inline]
pub fn planar_delta(from: &Point3, to: &Point3) -> Vector3 {
    Vector3::new(to.x - from.x, to.y - from.y, 0.0)
}

/// Horizontal distance between two points.
#[inline]
pub fn planar_distance(a: &Point3, b: &Point3) -> f32 {
    planar_delta(a, b).norm()
}

/// Yaw (radians) that faces along `delta`, or `None` when `delta` has no
/// horizontal extent.
#[inline]
pub fn yaw_of(delta: &Vector3) -> Option<f32> {
    if delta.x.abs() <= DIR_EPS && delta.y.abs() <= DIR_EPS {
        return None;
    }
    Some(delta.x.atan2(delta.y))
}

/// Pitch (radians, positive up) of the line from `from` to `to`.
#[inline]
pub fn pitch_between(from: &Point3, to: &Point3) -> f32 {
    let horizontal = planar_distance(from, to);
    let vertical = to.z - from.z;
    vertical.atan2(horizontal)
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(mut a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !a.is_finite() {
        return 0.0;
    }
    a %= TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Unit vector in the ground plane for a yaw angle.
#[inline]
pub fn yaw_direction(yaw: f32) -> Vector3 {
    Vector3::new(yaw.sin(), yaw.cos(), 0.0)
}

// ── Aabb ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box, used for nav-mesh bounds and scene occluders.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    /// Box spanning two corners given in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Cube of side `2 * half` centred on `center`.
    pub fn around(center: Point3, half: f32) -> Self {
        let h = Vector3::repeat(half.abs());
        Self { min: center - h, max: center + h }
    }

    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x
            && p.y >= self.min.y && p.y <= self.max.y
            && p.z >= self.min.z && p.z <= self.max.z
    }

    /// `true` if `other` lies entirely inside `self`.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    pub fn volume(&self) -> f32 {
        let e = self.max - self.min;
        e.x * e.y * e.z
    }

    /// Slab test: does the segment `a → b` pass through the box?
    pub fn intersects_segment(&self, a: &Point3, b: &Point3) -> bool {
        let d = b - a;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = a[axis];
            let dir = d[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}
