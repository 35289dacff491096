//! Planes and rays
//!
//! A point `p` lies on a [`Plane`] when `dot(normal, p) + distance == 0`.
//! The half space the normal points into is the positive side.

use crate::bounds::Bounds;
use crate::error::MathError;
use crate::math::vec::Vector3;
use fake::Dummy;
use serde::{Deserialize, Serialize};

/// Tolerance on the projected area when testing triangle hits.
const TRIANGLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneSide {
    /// On the plane itself
    None,
    Positive,
    Negative,
    /// Straddling the plane, only reported for volumes
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Dummy)]
pub struct Plane {
    pub normal: Vector3,
    pub distance: f32,
}

impl Plane {
    /// Plane with the given normal, which is normalized, and `distance` from
    /// the origin.
    pub fn new(normal: Vector3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Plane from the equation `a*x + b*y + c*z + d = 0`, scaled so the
    /// normal has unit length.
    pub fn from_coefficients(a: f32, b: f32, c: f32, d: f32) -> Result<Self, MathError> {
        let normal = Vector3::new(a, b, c);
        let length = normal.magnitude();
        if length <= Vector3::K_EPSILON || !length.is_finite() {
            return Err(MathError::ZeroLength);
        }
        Ok(Self {
            normal: normal / length,
            distance: d / length,
        })
    }

    pub fn from_point_normal(point: Vector3, normal: Vector3) -> Self {
        let normal = normal.normalized();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Plane through three points, facing the side from which they appear in
    /// counter clockwise order.
    ///
    /// Fails with [`MathError::ZeroLength`] for collinear points.
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Result<Self, MathError> {
        let normal = Vector3::cross(b - a, c - a).try_normalized()?;
        Ok(Self {
            normal,
            distance: -normal.dot(a),
        })
    }

    /// Signed distance, positive on the side the normal points to.
    pub fn get_distance_to_point(&self, point: Vector3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// True when `point` is on the positive side.
    pub fn get_side(&self, point: Vector3) -> bool {
        self.get_distance_to_point(point) > 0.0
    }

    pub fn same_side(&self, a: Vector3, b: Vector3) -> bool {
        self.get_side(a) == self.get_side(b)
    }

    pub fn side(&self, point: Vector3) -> PlaneSide {
        let distance = self.get_distance_to_point(point);
        if distance < 0.0 {
            PlaneSide::Negative
        } else if distance > 0.0 {
            PlaneSide::Positive
        } else {
            PlaneSide::None
        }
    }

    /// Side of an axis aligned box, [`PlaneSide::Both`] when the box touches
    /// or crosses the plane.
    pub fn side_of_bounds(&self, bounds: &Bounds) -> PlaneSide {
        let distance = self.get_distance_to_point(bounds.center());
        let extents = bounds.extents();
        let reach = (self.normal.x * extents.x).abs()
            + (self.normal.y * extents.y).abs()
            + (self.normal.z * extents.z).abs();

        if distance < -reach {
            PlaneSide::Negative
        } else if distance > reach {
            PlaneSide::Positive
        } else {
            PlaneSide::Both
        }
    }

    pub fn closest_point_on_plane(&self, point: Vector3) -> Vector3 {
        point - self.normal * self.get_distance_to_point(point)
    }

    /// Part of `vector` perpendicular to the normal.
    pub fn project_vector(&self, vector: Vector3) -> Vector3 {
        vector - self.normal * self.normal.dot(vector)
    }

    /// Same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    pub fn translate(&self, translation: Vector3) -> Self {
        Self {
            normal: self.normal,
            distance: self.distance - self.normal.dot(translation),
        }
    }

    /// Distance along the ray at which it enters the plane, `None` for rays
    /// that are parallel to or point away from the plane.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let denominator = self.normal.dot(ray.direction);
        if denominator.abs() < f32::EPSILON {
            return None;
        }
        let enter = -self.get_distance_to_point(ray.origin) / denominator;
        (enter >= 0.0).then_some(enter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Dummy)]
pub struct Ray {
    pub origin: Vector3,
    /// Unit length unless constructed from a zero direction
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    pub fn get_point(&self, distance: f32) -> Vector3 {
        self.origin + self.direction * distance
    }

    /// Distance to the hit with triangle `(a, b, c)`.
    ///
    /// `positive_side` accepts hits on the front face (counter clockwise
    /// winding seen from the ray), `negative_side` on the back face.
    pub fn intersect_triangle(
        &self,
        a: Vector3,
        b: Vector3,
        c: Vector3,
        positive_side: bool,
        negative_side: bool,
    ) -> Option<f32> {
        let normal = Vector3::cross(b - a, c - a);
        let denominator = normal.dot(self.direction);
        if denominator > f32::EPSILON {
            if !negative_side {
                return None;
            }
        } else if denominator < -f32::EPSILON {
            if !positive_side {
                return None;
            }
        } else {
            // parallel, or a degenerate triangle
            return None;
        }

        let t = normal.dot(a - self.origin) / denominator;
        if t < 0.0 {
            return None;
        }

        // project onto the axis plane where the triangle has the largest area
        let n = [normal.x.abs(), normal.y.abs(), normal.z.abs()];
        let (i0, i1) = if n[1] > n[2] {
            (if n[1] > n[0] { 0 } else { 1 }, 2)
        } else {
            (1, if n[2] > n[0] { 0 } else { 2 })
        };

        let u1 = b[i0] - a[i0];
        let v1 = b[i1] - a[i1];
        let u2 = c[i0] - a[i0];
        let v2 = c[i1] - a[i1];
        let u0 = t * self.direction[i0] + self.origin[i0] - a[i0];
        let v0 = t * self.direction[i1] + self.origin[i1] - a[i1];

        let alpha = u0 * v2 - u2 * v0;
        let beta = u1 * v0 - u0 * v1;
        let area = u1 * v2 - u2 * v1;
        let tolerance = -TRIANGLE_EPSILON * area;

        let outside = if area > 0.0 {
            alpha < tolerance || beta < tolerance || alpha + beta > area - tolerance
        } else {
            alpha > tolerance || beta > tolerance || alpha + beta < area - tolerance
        };
        (!outside).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_new_normalizes() {
        let plane = Plane::new(Vector3::new(0.0, 2.0, 0.0), -3.0);
        assert_eq!(plane.normal, Vector3::UP);
        assert_eq!(plane.distance, -3.0);
        assert!(approx_eq(plane.get_distance_to_point(Vector3::new(1.0, 3.0, 1.0)), 0.0));
    }

    #[test]
    fn test_from_coefficients() {
        let plane = Plane::from_coefficients(0.0, 0.0, 2.0, 4.0).unwrap();
        assert_eq!(plane.normal, Vector3::FORWARD);
        assert_eq!(plane.distance, 2.0);
        assert_eq!(
            Plane::from_coefficients(0.0, 0.0, 0.0, 1.0),
            Err(MathError::ZeroLength)
        );
    }

    #[test]
    fn test_from_points() {
        let plane = Plane::from_points(
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(plane.normal.approx_eq(Vector3::UP, EPSILON));
        assert!(approx_eq(plane.distance, -1.0));

        let collinear = Plane::from_points(Vector3::ZERO, Vector3::ONE, Vector3::ONE * 2.0);
        assert_eq!(collinear, Err(MathError::ZeroLength));
    }

    #[test]
    fn test_sides() {
        let plane = Plane::from_point_normal(Vector3::new(0.0, 2.0, 0.0), Vector3::UP);
        assert!(plane.get_side(Vector3::new(0.0, 3.0, 0.0)));
        assert!(!plane.get_side(Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(plane.side(Vector3::new(5.0, 3.0, 0.0)), PlaneSide::Positive);
        assert_eq!(plane.side(Vector3::new(5.0, 1.0, 0.0)), PlaneSide::Negative);
        assert_eq!(plane.side(Vector3::new(5.0, 2.0, 0.0)), PlaneSide::None);
        assert!(plane.same_side(Vector3::ZERO, Vector3::new(9.0, -9.0, 9.0)));
        assert!(!plane.same_side(Vector3::ZERO, Vector3::new(0.0, 9.0, 0.0)));
    }

    #[test]
    fn test_side_of_bounds() {
        let plane = Plane::new(Vector3::UP, 0.0);
        let above = Bounds::new(Vector3::new(0.0, 2.0, 0.0), Vector3::ONE);
        let below = Bounds::new(Vector3::new(0.0, -2.0, 0.0), Vector3::ONE);
        let across = Bounds::new(Vector3::new(0.0, 0.25, 0.0), Vector3::ONE);
        assert_eq!(plane.side_of_bounds(&above), PlaneSide::Positive);
        assert_eq!(plane.side_of_bounds(&below), PlaneSide::Negative);
        assert_eq!(plane.side_of_bounds(&across), PlaneSide::Both);
    }

    #[test]
    fn test_closest_point_and_projection() {
        let plane = Plane::new(Vector3::UP, -1.0);
        assert_eq!(
            plane.closest_point_on_plane(Vector3::new(3.0, 5.0, -2.0)),
            Vector3::new(3.0, 1.0, -2.0)
        );
        assert_eq!(
            plane.project_vector(Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(1.0, 0.0, 3.0)
        );
    }

    #[test]
    fn test_flipped_and_translate() {
        let plane = Plane::new(Vector3::UP, -1.0);
        let flipped = plane.flipped();
        let point = Vector3::new(0.0, 4.0, 0.0);
        assert_eq!(
            flipped.get_distance_to_point(point),
            -plane.get_distance_to_point(point)
        );

        let moved = plane.translate(Vector3::new(7.0, 2.0, 0.0));
        assert_eq!(moved.get_distance_to_point(Vector3::new(0.0, 3.0, 0.0)), 0.0);
    }

    #[test]
    fn test_raycast() {
        let plane = Plane::new(Vector3::UP, 0.0);
        let down = Ray::new(Vector3::new(1.0, 5.0, 1.0), Vector3::new(0.0, -2.0, 0.0));
        let enter = plane.raycast(&down).unwrap();
        assert!(approx_eq(enter, 5.0));
        assert!(down.get_point(enter).approx_eq(Vector3::new(1.0, 0.0, 1.0), EPSILON));

        let up = Ray::new(Vector3::new(1.0, 5.0, 1.0), Vector3::UP);
        assert_eq!(plane.raycast(&up), None);
        let parallel = Ray::new(Vector3::new(1.0, 5.0, 1.0), Vector3::RIGHT);
        assert_eq!(plane.raycast(&parallel), None);
    }

    #[test]
    fn test_ray_new_normalizes() {
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 10.0));
        assert_eq!(ray.direction, Vector3::FORWARD);
        assert_eq!(ray.get_point(2.5), Vector3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn test_intersect_triangle() {
        // counter clockwise seen from +Z
        let a = Vector3::new(-1.0, -1.0, 0.0);
        let b = Vector3::new(1.0, -1.0, 0.0);
        let c = Vector3::new(0.0, 1.0, 0.0);

        let front = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::BACK);
        assert_eq!(front.intersect_triangle(a, b, c, true, false), Some(3.0));
        assert_eq!(front.intersect_triangle(a, b, c, false, true), None);
        assert_eq!(front.intersect_triangle(a, c, b, false, true), Some(3.0));

        let miss = Ray::new(Vector3::new(5.0, 0.0, 3.0), Vector3::BACK);
        assert_eq!(miss.intersect_triangle(a, b, c, true, true), None);

        let behind = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::BACK);
        assert_eq!(behind.intersect_triangle(a, b, c, true, true), None);

        let parallel = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::RIGHT);
        assert_eq!(parallel.intersect_triangle(a, b, c, true, true), None);
    }
}
