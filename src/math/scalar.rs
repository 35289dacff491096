//! Scalar helpers shared by the vector, quaternion and color code.
//!
//! Angles in the public API are in degrees, matching what the engine exposes
//! to scripts. Radians only show up inside the trigonometry.

pub const PI: f32 = std::f32::consts::PI;
pub const DEG2RAD: f32 = PI / 180.0;
pub const RAD2DEG: f32 = 180.0 / PI;

/// Smallest difference treated as significant by [`approximately`].
pub const EPSILON: f32 = 1e-6;

/// Relative singularity tolerance for matrix inverses.
///
/// A matrix counts as singular when `|det|` is not above this factor times
/// the product of its column lengths. That product bounds `|det|`, so the
/// test does not depend on the overall scale of the matrix.
pub const SINGULAR_EPSILON: f32 = 16.0 * f32::EPSILON;

/// True when `determinant` is too small, relative to the `column_lengths`,
/// for the matrix to be inverted in f32.
pub fn is_singular(determinant: f32, column_lengths: &[f32]) -> bool {
    if !determinant.is_finite() {
        return true;
    }
    let scale: f64 = column_lengths.iter().map(|&l| l as f64).product();
    !((determinant.abs() as f64) > SINGULAR_EPSILON as f64 * scale)
}

#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[inline]
pub fn clamp01(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Interpolates between `a` and `b`, `t` is clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    lerp_unclamped(a, b, clamp01(t))
}

#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The `t` for which `lerp(a, b, t) == value`, clamped to `[0, 1]`.
///
/// Returns 0 when `a == b`.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        clamp01((value - a) / (b - a))
    }
}

/// Maps `value` from `[min1, max1]` onto `[min2, max2]`.
///
/// Inverted ranges collapse onto their start like the engine's remap does.
pub fn remap(value: f32, min1: f32, max1: f32, min2: f32, max2: f32) -> f32 {
    let stop1 = max1.max(min1);
    let stop2 = max2.max(min2);
    if stop1 == min1 {
        return min2;
    }
    min2 + (stop2 - min2) * ((value - min1) / (stop1 - min1))
}

/// Hermite interpolation between two edges.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed difference between two angles in degrees, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Moves `current` towards `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Compares two floats with a tolerance relative to their magnitude.
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}
