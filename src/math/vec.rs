//! Vector value types.
//!
//! `Vector2`, `Vector3` and `Vector4` share their componentwise arithmetic
//! through `impl_vector!`, type specific operations (cross product, plane
//! projection, ...) are implemented next to each type.

use crate::error::{MathError, check_index};
use crate::math::quaternion::Quaternion;
use crate::math::scalar::{self, DEG2RAD, RAD2DEG};
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

macro_rules! impl_vector {
    ($name:ident, $len:expr, $($field:ident),+) => {
        impl $name {
            /// Magnitude below which a vector is considered zero length.
            pub const K_EPSILON: f32 = 1e-5;

            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            pub fn sqr_magnitude(self) -> f32 {
                self.dot(self)
            }

            pub fn magnitude(self) -> f32 {
                self.sqr_magnitude().sqrt()
            }

            pub fn distance(self, other: Self) -> f32 {
                (self - other).magnitude()
            }

            /// Unit length copy of this vector, or the zero vector if the
            /// magnitude is not above [`Self::K_EPSILON`].
            pub fn normalized(self) -> Self {
                self.try_normalized().unwrap_or_default()
            }

            pub fn try_normalized(self) -> Result<Self, MathError> {
                let magnitude = self.magnitude();
                if magnitude > Self::K_EPSILON {
                    Ok(self / magnitude)
                } else {
                    Err(MathError::ZeroLength)
                }
            }

            pub fn normalize(&mut self) {
                *self = self.normalized();
            }

            /// Interpolates between `a` and `b`, `t` is clamped to `[0, 1]`.
            pub fn lerp(a: Self, b: Self, t: f32) -> Self {
                Self::lerp_unclamped(a, b, scalar::clamp01(t))
            }

            pub fn lerp_unclamped(a: Self, b: Self, t: f32) -> Self {
                Self { $($field: a.$field + (b.$field - a.$field) * t),+ }
            }

            /// Componentwise minimum.
            pub fn min(a: Self, b: Self) -> Self {
                Self { $($field: a.$field.min(b.$field)),+ }
            }

            /// Componentwise maximum.
            pub fn max(a: Self, b: Self) -> Self {
                Self { $($field: a.$field.max(b.$field)),+ }
            }

            /// Componentwise product.
            pub fn scale(a: Self, b: Self) -> Self {
                Self { $($field: a.$field * b.$field),+ }
            }

            /// Moves `current` in a straight line towards `target`, by at most
            /// `max_distance_delta`.
            pub fn move_towards(current: Self, target: Self, max_distance_delta: f32) -> Self {
                let to_target = target - current;
                let distance = to_target.magnitude();
                if distance <= max_distance_delta || distance == 0.0 {
                    target
                } else {
                    current + to_target / distance * max_distance_delta
                }
            }

            /// Copy of `vector` with its magnitude limited to `max_length`.
            pub fn clamp_magnitude(vector: Self, max_length: f32) -> Self {
                let sqr = vector.sqr_magnitude();
                if sqr > max_length * max_length {
                    vector / sqr.sqrt() * max_length
                } else {
                    vector
                }
            }

            /// Compares with a tolerance on the squared distance, the way
            /// scripts expect `==` on vectors to behave.
            pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
                (self - other).sqr_magnitude() <= epsilon * epsilon
            }

            pub fn is_finite(self) -> bool {
                true $(&& self.$field.is_finite())+
            }

            pub fn get(&self, index: usize) -> Result<f32, MathError> {
                check_index(index, $len).map(|i| self[i])
            }

            pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
                let i = check_index(index, $len)?;
                self[i] = value;
                Ok(())
            }

            pub fn to_array(self) -> [f32; $len] {
                [$(self.$field),+]
            }
        }

        impl From<[f32; $len]> for $name {
            fn from(array: [f32; $len]) -> Self {
                let [$($field),+] = array;
                Self { $($field),+ }
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;
            fn mul(self, s: f32) -> Self {
                Self { $($field: self.$field * s),+ }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;
            fn mul(self, v: $name) -> $name {
                v * self
            }
        }

        impl Div<f32> for $name {
            type Output = Self;
            fn div(self, s: f32) -> Self {
                Self { $($field: self.$field / s),+ }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                $(self.$field += other.$field;)+
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, other: Self) {
                $(self.$field -= other.$field;)+
            }
        }

        impl MulAssign<f32> for $name {
            fn mul_assign(&mut self, s: f32) {
                $(self.$field *= s;)+
            }
        }

        impl DivAssign<f32> for $name {
            fn div_assign(&mut self, s: f32) {
                $(self.$field /= s;)+
            }
        }
    };
}

/// Component access by position, panics outside `0..len` like slices.
macro_rules! impl_index {
    ($name:ident, $($index:literal => $field:ident),+) => {
        impl Index<usize> for $name {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match index {
                    $($index => &self.$field,)+
                    _ => panic!("invalid {} index {}", stringify!($name), index),
                }
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                match index {
                    $($index => &mut self.$field,)+
                    _ => panic!("invalid {} index {}", stringify!($name), index),
                }
            }
        }
    };
}

/// 2D vector, used for UI anchors, sizes and texture coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Dummy)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl_vector!(Vector2, 2, x, y);
impl_index!(Vector2, 0 => x, 1 => y);

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);
    pub const ONE: Vector2 = Vector2::new(1.0, 1.0);
    pub const UP: Vector2 = Vector2::new(0.0, 1.0);
    pub const DOWN: Vector2 = Vector2::new(0.0, -1.0);
    pub const LEFT: Vector2 = Vector2::new(-1.0, 0.0);
    pub const RIGHT: Vector2 = Vector2::new(1.0, 0.0);

    /// Counter-clockwise perpendicular.
    pub fn perpendicular(self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    /// Unsigned angle in degrees, 0 if either vector is zero length.
    pub fn angle(from: Vector2, to: Vector2) -> f32 {
        let denominator = (from.sqr_magnitude() * to.sqr_magnitude()).sqrt();
        if denominator < 1e-15 {
            return 0.0;
        }
        let cos = scalar::clamp(from.dot(to) / denominator, -1.0, 1.0);
        cos.acos() * RAD2DEG
    }

    pub fn reflect(direction: Vector2, normal: Vector2) -> Vector2 {
        direction - normal * (2.0 * direction.dot(normal))
    }

    /// Signed area of the parallelogram spanned by `a` and `b`.
    pub fn cross(a: Vector2, b: Vector2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// True if `point` lies inside triangle `a, b, c`, in either winding.
    ///
    /// Points exactly on an edge may go either way.
    pub fn point_in_triangle(point: Vector2, a: Vector2, b: Vector2, c: Vector2) -> bool {
        let side_ab = Vector2::cross(b - a, point - a) > 0.0;
        if (Vector2::cross(c - a, point - a) > 0.0) == side_ab {
            return false;
        }
        (Vector2::cross(c - b, point - b) > 0.0) == side_ab
    }

    /// Rotates a texture coordinate clockwise by `degrees` around the
    /// texture center `(0.5, 0.5)`.
    pub fn rotate_uv(uv: Vector2, degrees: f32) -> Vector2 {
        let (sin, cos) = (degrees * DEG2RAD).sin_cos();
        let (x, y) = (uv.x - 0.5, uv.y - 0.5);
        Vector2::new(cos * x + sin * y + 0.5, cos * y - sin * x + 0.5)
    }
}

/// 3D vector for positions, directions and euler angles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Dummy)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector!(Vector3, 3, x, y, z);
impl_index!(Vector3, 0 => x, 1 => y, 2 => z);

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);
    pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const DOWN: Vector3 = Vector3::new(0.0, -1.0, 0.0);
    pub const LEFT: Vector3 = Vector3::new(-1.0, 0.0, 0.0);
    pub const RIGHT: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const FORWARD: Vector3 = Vector3::new(0.0, 0.0, 1.0);
    pub const BACK: Vector3 = Vector3::new(0.0, 0.0, -1.0);

    pub fn cross(a: Vector3, b: Vector3) -> Vector3 {
        Vector3 {
            x: a.y * b.z - a.z * b.y,
            y: a.z * b.x - a.x * b.z,
            z: a.x * b.y - a.y * b.x,
        }
    }

    /// Unsigned angle in degrees, 0 if either vector is zero length.
    pub fn angle(from: Vector3, to: Vector3) -> f32 {
        let denominator = (from.sqr_magnitude() * to.sqr_magnitude()).sqrt();
        if denominator < 1e-15 {
            return 0.0;
        }
        let cos = scalar::clamp(from.dot(to) / denominator, -1.0, 1.0);
        cos.acos() * RAD2DEG
    }

    /// Angle in degrees around `axis`, positive when the rotation from
    /// `from` to `to` is counter-clockwise looking down the axis.
    pub fn signed_angle(from: Vector3, to: Vector3, axis: Vector3) -> f32 {
        let unsigned = Vector3::angle(from, to);
        if axis.dot(Vector3::cross(from, to)) < 0.0 {
            -unsigned
        } else {
            unsigned
        }
    }

    /// Projects `vector` onto `on_normal`, zero for a zero length normal.
    pub fn project(vector: Vector3, on_normal: Vector3) -> Vector3 {
        let sqr = on_normal.sqr_magnitude();
        if sqr < f32::EPSILON {
            Vector3::ZERO
        } else {
            on_normal * (vector.dot(on_normal) / sqr)
        }
    }

    pub fn project_on_plane(vector: Vector3, plane_normal: Vector3) -> Vector3 {
        vector - Vector3::project(vector, plane_normal)
    }

    pub fn reflect(direction: Vector3, normal: Vector3) -> Vector3 {
        direction - normal * (2.0 * direction.dot(normal))
    }

    /// Rotates `point` by `rotation` around `pivot` instead of the origin.
    pub fn rotate_around(point: Vector3, pivot: Vector3, rotation: Quaternion) -> Vector3 {
        pivot + rotation * (point - pivot)
    }
}

/// 4D vector, homogeneous coordinates and matrix columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Dummy)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector!(Vector4, 4, x, y, z, w);
impl_index!(Vector4, 0 => x, 1 => y, 2 => z, 3 => w);

impl Vector4 {
    pub const ZERO: Vector4 = Vector4::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Vector4 = Vector4::new(1.0, 1.0, 1.0, 1.0);

    /// Drops `w` without a perspective divide.
    pub fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector2> for Vector3 {
    fn from(v: Vector2) -> Self {
        Vector3::new(v.x, v.y, 0.0)
    }
}

impl From<Vector3> for Vector2 {
    fn from(v: Vector3) -> Self {
        Vector2::new(v.x, v.y)
    }
}

/// Directions get `w = 0`, use `Vector4::new(x, y, z, 1.0)` for points.
impl From<Vector3> for Vector4 {
    fn from(v: Vector3) -> Self {
        Vector4::new(v.x, v.y, v.z, 0.0)
    }
}

impl From<Vector4> for Vector3 {
    fn from(v: Vector4) -> Self {
        v.xyz()
    }
}

impl std::fmt::Display for Vector2 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl std::fmt::Display for Vector4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}
