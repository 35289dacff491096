//! Rotation quaternions
//!
//! Composition follows the Hamilton product: for `a * b` the rotation `b` is
//! applied first, then `a`. A child's world rotation is therefore
//! `parent * local`, and `(a * b) * v == a * (b * v)`.
//!
//! Euler angles are in degrees and use the engine's native order: the roll
//! around X is applied first, then the pitch around Y, then the yaw around Z
//! (`euler(x, y, z) == angle_axis(z, Z) * angle_axis(y, Y) * angle_axis(x, X)`).

use crate::error::MathError;
use crate::math::matrix3::Matrix3;
use crate::math::scalar::{self, DEG2RAD, RAD2DEG};
use crate::math::vec::Vector3;
use fake::Dummy;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg};

/// Rotation stored as `x, y, z` (vector part) and `w` (scalar part).
///
/// Non unit quaternions are allowed as intermediate values, rotating vectors
/// assumes unit length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Dummy)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const K_EPSILON: f32 = 0.000001;

    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32, w: f32) {
        *self = Self::new(x, y, z, w);
    }

    pub fn dot(a: Quaternion, b: Quaternion) -> f32 {
        a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
    }

    /// Tolerance test shared by `==` and [`Quaternion::angle`]. False for NaN.
    fn is_equal_using_dot(dot: f32) -> bool {
        dot > 1.0 - Self::K_EPSILON
    }

    /// Rotation built from euler angles in degrees.
    pub fn euler(x: f32, y: f32, z: f32) -> Quaternion {
        let roll = x as f64 * DEG2RAD as f64 * 0.5;
        let pitch = y as f64 * DEG2RAD as f64 * 0.5;
        let yaw = z as f64 * DEG2RAD as f64 * 0.5;

        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();

        Quaternion::new(
            (sr * cp * cy - cr * sp * sy) as f32,
            (cr * sp * cy + sr * cp * sy) as f32,
            (cr * cp * sy - sr * sp * cy) as f32,
            (cr * cp * cy + sr * sp * sy) as f32,
        )
    }

    pub fn from_euler(angles: Vector3) -> Quaternion {
        Self::euler(angles.x, angles.y, angles.z)
    }

    /// Euler angles in degrees, each wrapped into `[0, 360)`.
    ///
    /// Inverse of [`Quaternion::euler`]. When the pitch reaches ±90 degrees
    /// roll and yaw become the same axis, the roll is then reported as 0.
    pub fn euler_angles(self) -> Vector3 {
        let q = self.normalized();
        let (x, y, z, w) = (q.x as f64, q.y as f64, q.z as f64, q.w as f64);

        let sinp = 2.0 * (w * y - z * x);
        let (roll, pitch, yaw) = if sinp.abs() >= 1.0 - 1e-6 {
            let pitch = std::f64::consts::FRAC_PI_2.copysign(sinp);
            (0.0, pitch, 2.0 * z.atan2(w))
        } else {
            let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
            let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
            (roll, sinp.asin(), yaw)
        };

        let to_degrees = RAD2DEG as f64;
        Vector3::new(
            scalar::normalize_angle((roll * to_degrees) as f32),
            scalar::normalize_angle((pitch * to_degrees) as f32),
            scalar::normalize_angle((yaw * to_degrees) as f32),
        )
    }

    pub fn set_euler_angles(&mut self, angles: Vector3) {
        *self = Self::from_euler(angles);
    }

    /// Rotation of `angle` degrees around `axis`. A zero axis gives identity.
    pub fn angle_axis(angle: f32, axis: Vector3) -> Quaternion {
        let Ok(axis) = axis.try_normalized() else {
            return Self::IDENTITY;
        };
        let (sin, cos) = (angle * DEG2RAD * 0.5).sin_cos();
        Quaternion::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Angle in degrees and unit axis of this rotation.
    ///
    /// The identity reports `(0, RIGHT)`.
    pub fn to_angle_axis(self) -> (f32, Vector3) {
        let q = self.normalized();
        let w = scalar::clamp(q.w, -1.0, 1.0);
        let angle = 2.0 * w.acos() * RAD2DEG;
        let sin = (1.0 - w * w).sqrt();
        if sin < 1e-4 {
            return (angle, Vector3::RIGHT);
        }
        (angle, Vector3::new(q.x / sin, q.y / sin, q.z / sin))
    }

    /// Rotation that turns +Z into `forward` while keeping +Y as close to
    /// `up` as possible.
    ///
    /// A zero `forward` returns identity. When `up` is parallel to `forward`
    /// another up axis is picked.
    pub fn look_rotation(forward: Vector3, up: Vector3) -> Quaternion {
        let Ok(forward) = forward.try_normalized() else {
            warn!("look rotation viewing vector is zero, using identity");
            return Self::IDENTITY;
        };
        let right = match Vector3::cross(up, forward).try_normalized() {
            Ok(right) => right,
            Err(_) => {
                let fallback = if forward.x.abs() < 0.9 {
                    Vector3::RIGHT
                } else {
                    Vector3::UP
                };
                Vector3::cross(Vector3::cross(forward, fallback), forward).normalized()
            }
        };
        let up = Vector3::cross(forward, right);
        Matrix3::from_columns(right, up, forward).to_quaternion()
    }

    pub fn set_look_rotation(&mut self, view: Vector3, up: Vector3) {
        *self = Self::look_rotation(view, up);
    }

    /// Shortest rotation turning direction `from` into direction `to`.
    pub fn from_to_rotation(from: Vector3, to: Vector3) -> Quaternion {
        let (Ok(from), Ok(to)) = (from.try_normalized(), to.try_normalized()) else {
            return Self::IDENTITY;
        };
        let dot = from.dot(to);
        if dot >= 1.0 - Self::K_EPSILON {
            return Self::IDENTITY;
        }
        if dot <= -1.0 + Self::K_EPSILON {
            let mut axis = Vector3::cross(Vector3::RIGHT, from);
            if axis.sqr_magnitude() < 1e-6 {
                axis = Vector3::cross(Vector3::UP, from);
            }
            return Self::angle_axis(180.0, axis);
        }
        let axis = Vector3::cross(from, to);
        Quaternion::new(axis.x, axis.y, axis.z, 1.0 + dot).normalized()
    }

    /// Angle in degrees between two rotations.
    pub fn angle(a: Quaternion, b: Quaternion) -> f32 {
        let dot = Self::dot(a, b).abs().min(1.0);
        if Self::is_equal_using_dot(dot) {
            0.0
        } else {
            dot.acos() * 2.0 * RAD2DEG
        }
    }

    /// Spherical interpolation along the shorter arc, `t` clamped to `[0, 1]`.
    pub fn slerp(a: Quaternion, b: Quaternion, t: f32) -> Quaternion {
        Self::slerp_unclamped(a, b, scalar::clamp01(t))
    }

    pub fn slerp_unclamped(a: Quaternion, b: Quaternion, t: f32) -> Quaternion {
        let mut b = b;
        let mut cos = Self::dot(a, b);
        if cos < 0.0 {
            b = -b;
            cos = -cos;
        }

        // nearly parallel, sin(angle) would vanish
        if cos > 1.0 - Self::K_EPSILON {
            return Self::lerp_components(a, b, t).normalized();
        }

        let angle = cos.acos();
        let sin = angle.sin();
        let wa = ((1.0 - t) * angle).sin() / sin;
        let wb = (t * angle).sin() / sin;
        a * wa + b * wb
    }

    /// Normalized linear interpolation along the shorter arc, `t` clamped.
    pub fn lerp(a: Quaternion, b: Quaternion, t: f32) -> Quaternion {
        Self::lerp_unclamped(a, b, scalar::clamp01(t))
    }

    pub fn lerp_unclamped(a: Quaternion, b: Quaternion, t: f32) -> Quaternion {
        let b = if Self::dot(a, b) < 0.0 { -b } else { b };
        Self::lerp_components(a, b, t).normalized()
    }

    fn lerp_components(a: Quaternion, b: Quaternion, t: f32) -> Quaternion {
        Quaternion::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
            a.w + (b.w - a.w) * t,
        )
    }

    /// Rotates `from` towards `to` by at most `max_degrees_delta`.
    pub fn rotate_towards(from: Quaternion, to: Quaternion, max_degrees_delta: f32) -> Quaternion {
        let angle = Self::angle(from, to);
        if angle == 0.0 {
            return to;
        }
        Self::slerp_unclamped(from, to, (max_degrees_delta / angle).min(1.0))
    }

    /// Unit length copy, or identity when the norm is below [`Self::K_EPSILON`].
    pub fn normalized(self) -> Quaternion {
        self.try_normalized().unwrap_or_else(|_| {
            debug!("normalizing zero norm quaternion {self}, using identity");
            Self::IDENTITY
        })
    }

    pub fn try_normalized(self) -> Result<Quaternion, MathError> {
        let magnitude = Self::dot(self, self).sqrt();
        if magnitude < Self::K_EPSILON || !magnitude.is_finite() {
            return Err(MathError::ZeroNorm);
        }
        Ok(self * (1.0 / magnitude))
    }

    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    pub fn conjugate(self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Conjugate divided by the squared norm, fails for a zero quaternion.
    pub fn inverse(self) -> Result<Quaternion, MathError> {
        let norm = Self::dot(self, self);
        let inv_norm = 1.0 / norm;
        if norm <= 0.0 || !inv_norm.is_finite() {
            return Err(MathError::ZeroNorm);
        }
        Ok(self.conjugate() * inv_norm)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

/// Rotation equality: true when both describe the same rotation, so `q == -q`.
impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        Self::is_equal_using_dot(Self::dot(*self, *other).abs())
    }
}

/// Hamilton product, `rhs` is applied first.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        let lhs = self;
        Quaternion::new(
            lhs.w * rhs.x + lhs.x * rhs.w + lhs.y * rhs.z - lhs.z * rhs.y,
            lhs.w * rhs.y + lhs.y * rhs.w + lhs.z * rhs.x - lhs.x * rhs.z,
            lhs.w * rhs.z + lhs.z * rhs.w + lhs.x * rhs.y - lhs.y * rhs.x,
            lhs.w * rhs.w - lhs.x * rhs.x - lhs.y * rhs.y - lhs.z * rhs.z,
        )
    }
}

/// Rotates a vector, expanding the rotation matrix inline.
impl Mul<Vector3> for Quaternion {
    type Output = Vector3;

    fn mul(self, point: Vector3) -> Vector3 {
        let x2 = self.x * 2.0;
        let y2 = self.y * 2.0;
        let z2 = self.z * 2.0;
        let xx = self.x * x2;
        let yy = self.y * y2;
        let zz = self.z * z2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yz = self.y * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        Vector3::new(
            (1.0 - (yy + zz)) * point.x + (xy - wz) * point.y + (xz + wy) * point.z,
            (xy + wz) * point.x + (1.0 - (xx + zz)) * point.y + (yz - wx) * point.z,
            (xz - wy) * point.x + (yz + wx) * point.y + (1.0 - (xx + yy)) * point.z,
        )
    }
}

impl Mul<f32> for Quaternion {
    type Output = Quaternion;

    fn mul(self, s: f32) -> Quaternion {
        Quaternion::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, other: Quaternion) -> Quaternion {
        Quaternion::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl std::fmt::Display for Quaternion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_vec_eq(actual: Vector3, expected: Vector3) {
        assert!(
            actual.approx_eq(expected, EPSILON),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Quaternion::IDENTITY * v, v);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_angle_axis_rotates_vectors() {
        let q = Quaternion::angle_axis(90.0, Vector3::UP);
        // +Z turns into +X around Y
        assert_vec_eq(q * Vector3::FORWARD, Vector3::RIGHT);
        let q = Quaternion::angle_axis(90.0, Vector3::FORWARD);
        assert_vec_eq(q * Vector3::RIGHT, Vector3::UP);
        let q = Quaternion::angle_axis(90.0, Vector3::RIGHT);
        assert_vec_eq(q * Vector3::UP, Vector3::FORWARD);
    }

    #[test]
    fn test_angle_axis_zero_axis() {
        assert_eq!(
            Quaternion::angle_axis(45.0, Vector3::ZERO),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_multiplication_order() {
        let yaw = Quaternion::angle_axis(90.0, Vector3::UP);
        let roll = Quaternion::angle_axis(90.0, Vector3::FORWARD);
        let v = Vector3::RIGHT;
        // roll first: RIGHT -> UP, yaw leaves UP alone
        assert_vec_eq((yaw * roll) * v, Vector3::UP);
        // yaw first: RIGHT -> BACK, roll leaves BACK alone
        assert_vec_eq((roll * yaw) * v, Vector3::BACK);
    }

    #[test]
    fn test_euler_matches_axis_composition() {
        let q = Quaternion::euler(10.0, 20.0, 30.0);
        let composed = Quaternion::angle_axis(30.0, Vector3::FORWARD)
            * Quaternion::angle_axis(20.0, Vector3::UP)
            * Quaternion::angle_axis(10.0, Vector3::RIGHT);
        assert_eq!(q, composed);
    }

    #[test]
    fn test_euler_angles_round_trip() {
        for angles in [
            Vector3::new(10.0, 20.0, 30.0),
            Vector3::new(350.0, 45.0, 120.0),
            Vector3::new(0.0, 0.0, 270.0),
            Vector3::new(181.0, 10.0, 5.0),
        ] {
            let q = Quaternion::from_euler(angles);
            let back = Quaternion::from_euler(q.euler_angles());
            assert_eq!(back, q, "angles {angles}");
        }
        let angles = Quaternion::euler(10.0, 20.0, 30.0).euler_angles();
        assert_vec_eq(angles, Vector3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_euler_angles_gimbal_lock() {
        let q = Quaternion::euler(30.0, 90.0, 50.0);
        let angles = q.euler_angles();
        assert!(approx_eq(angles.y, 90.0), "pitch {}", angles.y);
        assert_eq!(angles.x, 0.0);
        assert_eq!(Quaternion::from_euler(angles), q);
    }

    #[test]
    fn test_euler_angles_identity() {
        assert_eq!(Quaternion::IDENTITY.euler_angles(), Vector3::ZERO);
    }

    #[test]
    fn test_equality_tolerates_double_cover() {
        let q = Quaternion::euler(10.0, 20.0, 30.0);
        assert_eq!(q, -q);
        assert_ne!(q, Quaternion::IDENTITY);
        let nan = Quaternion::new(f32::NAN, 0.0, 0.0, 1.0);
        assert_ne!(nan, nan);
    }

    #[test]
    fn test_angle() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::angle_axis(90.0, Vector3::UP);
        assert!(approx_eq(Quaternion::angle(a, b), 90.0));
        assert!(approx_eq(Quaternion::angle(a, -b), 90.0));
        assert_eq!(Quaternion::angle(b, b), 0.0);
    }

    #[test]
    fn test_slerp() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::angle_axis(90.0, Vector3::UP);
        let half = Quaternion::slerp(a, b, 0.5);
        assert!(approx_eq(Quaternion::angle(a, half), 45.0));
        assert_eq!(Quaternion::slerp(a, b, 0.0), a);
        assert_eq!(Quaternion::slerp(a, b, 1.0), b);
        assert_eq!(Quaternion::slerp(a, b, 3.0), b);
        let beyond = Quaternion::slerp_unclamped(a, b, 2.0);
        assert!(approx_eq(Quaternion::angle(a, beyond), 180.0));
    }

    #[test]
    fn test_slerp_takes_short_arc() {
        let a = Quaternion::IDENTITY;
        let b = -Quaternion::angle_axis(90.0, Vector3::UP);
        let half = Quaternion::slerp(a, b, 0.5);
        assert!(approx_eq(Quaternion::angle(a, half), 45.0));
        assert!(approx_eq(Quaternion::dot(half, half), 1.0));
    }

    #[test]
    fn test_slerp_nearly_equal_falls_back_to_lerp() {
        let a = Quaternion::angle_axis(10.0, Vector3::UP);
        let b = Quaternion::angle_axis(10.0001, Vector3::UP);
        let q = Quaternion::slerp(a, b, 0.5);
        assert!(q.is_finite());
        assert!(approx_eq(Quaternion::dot(q, q), 1.0));
    }

    #[test]
    fn test_rotate_towards() {
        let from = Quaternion::IDENTITY;
        let to = Quaternion::angle_axis(90.0, Vector3::UP);
        let step = Quaternion::rotate_towards(from, to, 30.0);
        assert!(approx_eq(Quaternion::angle(from, step), 30.0));
        assert_eq!(Quaternion::rotate_towards(from, to, 120.0), to);
        assert_eq!(Quaternion::rotate_towards(to, to, 5.0), to);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::euler(10.0, 20.0, 30.0);
        let inverse = q.inverse().unwrap();
        assert_eq!(q * inverse, Quaternion::IDENTITY);
        let scaled = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        assert_eq!(scaled.inverse().unwrap().w, 0.5);
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).inverse(),
            Err(MathError::ZeroNorm)
        );
    }

    #[test]
    fn test_normalized() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 4.0).normalized();
        assert_eq!(q.w, 1.0);
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized(),
            Quaternion::IDENTITY
        );
        assert_eq!(
            Quaternion::new(0.0, 0.0, 0.0, 0.0).try_normalized(),
            Err(MathError::ZeroNorm)
        );
    }

    #[test]
    fn test_look_rotation() {
        assert_eq!(
            Quaternion::look_rotation(Vector3::FORWARD, Vector3::UP),
            Quaternion::IDENTITY
        );
        let q = Quaternion::look_rotation(Vector3::RIGHT, Vector3::UP);
        assert_vec_eq(q * Vector3::FORWARD, Vector3::RIGHT);
        assert_vec_eq(q * Vector3::UP, Vector3::UP);

        let direction = Vector3::new(1.0, 2.0, -3.0);
        let q = Quaternion::look_rotation(direction, Vector3::UP);
        assert_vec_eq(q * Vector3::FORWARD, direction.normalized());
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert_eq!(
            Quaternion::look_rotation(Vector3::ZERO, Vector3::UP),
            Quaternion::IDENTITY
        );
        let q = Quaternion::look_rotation(Vector3::UP, Vector3::UP);
        assert!(q.is_finite());
        assert_vec_eq(q * Vector3::FORWARD, Vector3::UP);
    }

    #[test]
    fn test_from_to_rotation() {
        let q = Quaternion::from_to_rotation(Vector3::RIGHT, Vector3::UP);
        assert_vec_eq(q * Vector3::RIGHT, Vector3::UP);
        let q = Quaternion::from_to_rotation(Vector3::UP, Vector3::DOWN);
        assert_vec_eq(q * Vector3::UP, Vector3::DOWN);
        assert_eq!(
            Quaternion::from_to_rotation(Vector3::UP, Vector3::UP),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_to_angle_axis() {
        let (angle, axis) = Quaternion::angle_axis(60.0, Vector3::UP).to_angle_axis();
        assert!(approx_eq(angle, 60.0));
        assert_vec_eq(axis, Vector3::UP);
        let (angle, axis) = Quaternion::IDENTITY.to_angle_axis();
        assert_eq!(angle, 0.0);
        assert_eq!(axis, Vector3::RIGHT);
    }
}
