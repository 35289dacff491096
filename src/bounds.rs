//! Axis aligned bounding boxes
//!
//! [`Bounds`] stores a center and non negative half sizes (extents), so
//! `min <= max` holds on every axis.

use crate::math::{Matrix4, Ray, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsJson")]
pub struct Bounds {
    center: Vector3,
    extents: Vector3,
}

/// Serialized form, negative extents are flipped on the way in.
#[derive(Deserialize)]
struct BoundsJson {
    center: Vector3,
    extents: Vector3,
}

impl From<BoundsJson> for Bounds {
    fn from(json: BoundsJson) -> Self {
        Self {
            center: json.center,
            extents: abs(json.extents),
        }
    }
}

fn abs(v: Vector3) -> Vector3 {
    Vector3::new(v.x.abs(), v.y.abs(), v.z.abs())
}

impl Bounds {
    /// Box around `center` with the total `size`, negative sizes are
    /// flipped.
    pub fn new(center: Vector3, size: Vector3) -> Self {
        Self {
            center,
            extents: abs(size) * 0.5,
        }
    }

    /// Smallest box containing both corners, in whatever order they are
    /// given.
    pub fn from_min_max(min: Vector3, max: Vector3) -> Self {
        let mut bounds = Self::default();
        bounds.set_min_max(min, max);
        bounds
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vector3) {
        self.center = center;
    }

    pub fn extents(&self) -> Vector3 {
        self.extents
    }

    pub fn set_extents(&mut self, extents: Vector3) {
        self.extents = abs(extents);
    }

    pub fn size(&self) -> Vector3 {
        self.extents * 2.0
    }

    pub fn set_size(&mut self, size: Vector3) {
        self.extents = abs(size) * 0.5;
    }

    pub fn min(&self) -> Vector3 {
        self.center - self.extents
    }

    pub fn set_min(&mut self, min: Vector3) {
        self.set_min_max(min, self.max());
    }

    pub fn max(&self) -> Vector3 {
        self.center + self.extents
    }

    pub fn set_max(&mut self, max: Vector3) {
        self.set_min_max(self.min(), max);
    }

    pub fn set_min_max(&mut self, min: Vector3, max: Vector3) {
        let lower = Vector3::min(min, max);
        let upper = Vector3::max(min, max);
        self.extents = (upper - lower) * 0.5;
        self.center = lower + self.extents;
    }

    /// Grows the box to include `point`.
    pub fn encapsulate_point(&mut self, point: Vector3) {
        self.set_min_max(
            Vector3::min(self.min(), point),
            Vector3::max(self.max(), point),
        );
    }

    /// Grows the box to include the `other` box.
    pub fn encapsulate(&mut self, other: &Bounds) {
        self.encapsulate_point(other.min());
        self.encapsulate_point(other.max());
    }

    /// Grows the size by `amount` on every axis, half on each side.
    ///
    /// Shrinking stops at zero extents.
    pub fn expand(&mut self, amount: f32) {
        self.expand_by(Vector3::ONE * amount);
    }

    pub fn expand_by(&mut self, amount: Vector3) {
        self.extents = Vector3::max(self.extents + amount * 0.5, Vector3::ZERO);
    }

    /// Box around the transformed corners of this box.
    ///
    /// The center goes through the affine part of `matrix`, the extents
    /// through the absolute values of its upper 3x3.
    pub fn transform(&mut self, matrix: &Matrix4) {
        let [c0, c1, c2, _] = matrix.m;
        let e = self.extents;
        self.center = matrix.multiply_point3x4(self.center);
        self.extents = Vector3::new(
            c0[0].abs() * e.x + c1[0].abs() * e.y + c2[0].abs() * e.z,
            c0[1].abs() * e.x + c1[1].abs() * e.y + c2[1].abs() * e.z,
            c0[2].abs() * e.x + c1[2].abs() * e.y + c2[2].abs() * e.z,
        );
    }

    /// Scales both corners componentwise, relative to the origin.
    pub fn scale(&mut self, scale: Vector3) {
        self.set_min_max(
            Vector3::scale(self.min(), scale),
            Vector3::scale(self.max(), scale),
        );
    }

    /// Overlap test per axis, touching boxes intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());
        min.x <= other_max.x
            && max.x >= other_min.x
            && min.y <= other_max.y
            && max.y >= other_min.y
            && min.z <= other_max.z
            && max.z >= other_min.z
    }

    pub fn intersects_sphere(&self, center: Vector3, radius: f32) -> bool {
        self.sqr_distance(center) <= radius * radius
    }

    /// True if `point` is inside or on the surface.
    pub fn contains(&self, point: Vector3) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&point.x)
            && (min.y..=max.y).contains(&point.y)
            && (min.z..=max.z).contains(&point.z)
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.min()) && self.contains(other.max())
    }

    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        Vector3::min(Vector3::max(point, self.min()), self.max())
    }

    /// Squared distance from `point` to the box, 0 inside.
    pub fn sqr_distance(&self, point: Vector3) -> f32 {
        (self.closest_point(point) - point).sqr_magnitude()
    }

    pub fn distance(&self, point: Vector3) -> f32 {
        self.sqr_distance(point).sqrt()
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Distance along `ray` to where it enters the box, 0 when the origin is
    /// inside.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        if self.contains(ray.origin) {
            return Some(0.0);
        }
        let (min, max) = (self.min(), self.max());
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if direction == 0.0 {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - origin) / direction;
            let t2 = (max[axis] - origin) / direction;
            enter = enter.max(t1.min(t2));
            exit = exit.min(t1.max(t2));
        }
        (enter <= exit && enter >= 0.0).then_some(enter)
    }

    /// The eight corner points, `min` first and `max` last.
    pub fn corners(&self) -> [Vector3; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vector3::new(min.x, min.y, min.z),
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(max.x, max.y, min.z),
            Vector3::new(min.x, min.y, max.z),
            Vector3::new(max.x, min.y, max.z),
            Vector3::new(min.x, max.y, max.z),
            Vector3::new(max.x, max.y, max.z),
        ]
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Center: {}, Extents: {}", self.center, self.extents)
    }
}
