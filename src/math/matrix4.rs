//! 4x4 matrices for affine and projective transformations
//!
//! Same layout as [`Matrix3`]: column-major `m[column][row]`, flat index
//! `row + column * 4`, column vectors. `(A * B) * v == A * (B * v)`.
//!
//! Projection builders follow the OpenGL clip space conventions with a right
//! handed view space looking down -Z.

use crate::error::{MathError, check_index};
use crate::math::matrix3::Matrix3;
use crate::math::plane::Plane;
use crate::math::quaternion::Quaternion;
use crate::math::scalar::{self, DEG2RAD};
use crate::math::vec::{Vector3, Vector4};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Mul};

/// w components with a smaller magnitude can't be divided by.
const W_EPSILON: f32 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    /// Column-major data, `m[column][row]`
    pub m: [[f32; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const ZERO: Matrix4 = Matrix4 { m: [[0.0; 4]; 4] };

    pub const IDENTITY: Matrix4 = Matrix4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from entries given row by row.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m03: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m13: f32,
        m20: f32,
        m21: f32,
        m22: f32,
        m23: f32,
        m30: f32,
        m31: f32,
        m32: f32,
        m33: f32,
    ) -> Self {
        Self {
            m: [
                [m00, m10, m20, m30],
                [m01, m11, m21, m31],
                [m02, m12, m22, m32],
                [m03, m13, m23, m33],
            ],
        }
    }

    pub const fn from_columns(
        column0: Vector4,
        column1: Vector4,
        column2: Vector4,
        column3: Vector4,
    ) -> Self {
        Self {
            m: [
                [column0.x, column0.y, column0.z, column0.w],
                [column1.x, column1.y, column1.z, column1.w],
                [column2.x, column2.y, column2.z, column2.w],
                [column3.x, column3.y, column3.z, column3.w],
            ],
        }
    }

    pub fn translate(vector: Vector3) -> Self {
        let mut result = Self::IDENTITY;
        result.m[3] = [vector.x, vector.y, vector.z, 1.0];
        result
    }

    pub fn scale(vector: Vector3) -> Self {
        Matrix3::scale(vector).into()
    }

    pub fn rotate(q: Quaternion) -> Self {
        Matrix3::rotate(q).into()
    }

    /// Scale first, then rotate, then translate.
    pub fn trs(translation: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        let mut result: Matrix4 = Matrix3::rotate(rotation).into();
        for (column, factor) in result.m.iter_mut().zip(scale.to_array()) {
            for value in column.iter_mut().take(3) {
                *value *= factor;
            }
        }
        result.m[3] = [translation.x, translation.y, translation.z, 1.0];
        result
    }

    /// View matrix for a camera at `eye` looking at `target`.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Result<Self, MathError> {
        let forward = (target - eye)
            .try_normalized()
            .map_err(|_| MathError::InvalidProjection("eye and target coincide"))?;
        let side = Vector3::cross(forward, up)
            .try_normalized()
            .map_err(|_| MathError::InvalidProjection("up is parallel to the view direction"))?;
        let up = Vector3::cross(side, forward);

        Ok(Self::new(
            side.x,
            side.y,
            side.z,
            -side.dot(eye),
            up.x,
            up.y,
            up.z,
            -up.dot(eye),
            -forward.x,
            -forward.y,
            -forward.z,
            forward.dot(eye),
            0.0,
            0.0,
            0.0,
            1.0,
        ))
    }

    /// Perspective projection, `fov` is the vertical field of view in degrees.
    ///
    /// Maps `-near` to -1 and `-far` to +1 in normalized device depth.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self, MathError> {
        if !(fov > 0.0 && fov < 180.0) {
            return Err(MathError::InvalidProjection("fov must be in (0, 180) degrees"));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(MathError::InvalidProjection("aspect must be positive"));
        }
        if !(near > 0.0 && far > near && far.is_finite()) {
            return Err(MathError::InvalidProjection(
                "clip planes must satisfy 0 < near < far",
            ));
        }
        let f = 1.0 / (fov * DEG2RAD * 0.5).tan();
        let depth = near - far;

        let mut result = Self::ZERO;
        result.m[0][0] = f / aspect;
        result.m[1][1] = f;
        result.m[2][2] = (far + near) / depth;
        result.m[2][3] = -1.0;
        result.m[3][2] = 2.0 * far * near / depth;
        Ok(result)
    }

    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, MathError> {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;
        if width == 0.0 || height == 0.0 || depth == 0.0 {
            return Err(MathError::InvalidProjection("empty view volume"));
        }
        if !(width.is_finite() && height.is_finite() && depth.is_finite()) {
            return Err(MathError::InvalidProjection("view volume is not finite"));
        }

        let mut result = Self::IDENTITY;
        result.m[0][0] = 2.0 / width;
        result.m[1][1] = 2.0 / height;
        result.m[2][2] = -2.0 / depth;
        result.m[3][0] = -(right + left) / width;
        result.m[3][1] = -(top + bottom) / height;
        result.m[3][2] = -(far + near) / depth;
        Ok(result)
    }

    /// Entry at `(row, column)`.
    pub fn at(&self, row: usize, column: usize) -> Result<f32, MathError> {
        Ok(self.m[check_index(column, 4)?][check_index(row, 4)?])
    }

    pub fn set_at(&mut self, row: usize, column: usize, value: f32) -> Result<(), MathError> {
        self.m[check_index(column, 4)?][check_index(row, 4)?] = value;
        Ok(())
    }

    /// Entry at flat column-major `index`.
    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        check_index(index, 16).map(|i| self[i])
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        let i = check_index(index, 16)?;
        self[i] = value;
        Ok(())
    }

    pub fn get_column(&self, index: usize) -> Result<Vector4, MathError> {
        Ok(self.m[check_index(index, 4)?].into())
    }

    pub fn get_row(&self, index: usize) -> Result<Vector4, MathError> {
        let r = check_index(index, 4)?;
        Ok(Vector4::new(
            self.m[0][r],
            self.m[1][r],
            self.m[2][r],
            self.m[3][r],
        ))
    }

    pub fn set_column(&mut self, index: usize, column: Vector4) -> Result<(), MathError> {
        self.m[check_index(index, 4)?] = column.to_array();
        Ok(())
    }

    pub fn set_row(&mut self, index: usize, row: Vector4) -> Result<(), MathError> {
        let r = check_index(index, 4)?;
        for (column, value) in self.m.iter_mut().zip(row.to_array()) {
            column[r] = value;
        }
        Ok(())
    }

    pub fn get_position(&self) -> Vector3 {
        let [x, y, z, _] = self.m[3];
        Vector3::new(x, y, z)
    }

    /// Upper left 3x3 block
    pub fn to_matrix3(&self) -> Matrix3 {
        let c = |i: usize| Vector3::new(self.m[i][0], self.m[i][1], self.m[i][2]);
        Matrix3::from_columns(c(0), c(1), c(2))
    }

    /// Scale of the upper 3x3 block, assuming it is a rotation times a scale.
    ///
    /// Skew is lost. A mirrored basis is reported as a negative x scale.
    pub fn lossy_scale(&self) -> Vector3 {
        let basis = self.to_matrix3();
        let column = |i: usize| Vector3::new(basis.m[i][0], basis.m[i][1], basis.m[i][2]);
        let mut scale = Vector3::new(
            column(0).magnitude(),
            column(1).magnitude(),
            column(2).magnitude(),
        );
        if basis.determinant() < 0.0 {
            scale.x = -scale.x;
        }
        scale
    }

    /// Rotation part with the scale removed.
    pub fn rotation(&self) -> Quaternion {
        let basis = self.to_matrix3();
        let scale = self.lossy_scale();
        let column = |i: usize, s: f32| {
            let v = Vector3::new(basis.m[i][0], basis.m[i][1], basis.m[i][2]);
            if s == 0.0 { v } else { v / s }
        };
        Matrix3::from_columns(column(0, scale.x), column(1, scale.y), column(2, scale.z))
            .to_quaternion()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::ZERO;
        for (c, column) in self.m.iter().enumerate() {
            for (r, value) in column.iter().enumerate() {
                result.m[r][c] = *value;
            }
        }
        result
    }

    /// Entries by `(row, column)`, used by the cofactor expansion
    fn rows(&self) -> [[f32; 4]; 4] {
        self.transpose().m
    }

    /// 2x2 sub-determinants of the lower two rows, followed by the cofactors
    /// of the first row.
    fn first_row_cofactors(m: &[[f32; 4]; 4]) -> ([f32; 6], [f32; 4]) {
        let v0 = m[2][0] * m[3][1] - m[2][1] * m[3][0];
        let v1 = m[2][0] * m[3][2] - m[2][2] * m[3][0];
        let v2 = m[2][0] * m[3][3] - m[2][3] * m[3][0];
        let v3 = m[2][1] * m[3][2] - m[2][2] * m[3][1];
        let v4 = m[2][1] * m[3][3] - m[2][3] * m[3][1];
        let v5 = m[2][2] * m[3][3] - m[2][3] * m[3][2];

        let t00 = v5 * m[1][1] - v4 * m[1][2] + v3 * m[1][3];
        let t10 = -(v5 * m[1][0] - v2 * m[1][2] + v1 * m[1][3]);
        let t20 = v4 * m[1][0] - v2 * m[1][1] + v0 * m[1][3];
        let t30 = -(v3 * m[1][0] - v1 * m[1][1] + v0 * m[1][2]);

        ([v0, v1, v2, v3, v4, v5], [t00, t10, t20, t30])
    }

    pub fn determinant(&self) -> f32 {
        let m = self.rows();
        let (_, [t00, t10, t20, t30]) = Self::first_row_cofactors(&m);
        t00 * m[0][0] + t10 * m[0][1] + t20 * m[0][2] + t30 * m[0][3]
    }

    /// Inverse through 2x2 sub-determinants.
    ///
    /// Fails with [`MathError::Singular`] when the determinant is not finite
    /// or too small relative to the column lengths, see
    /// [`scalar::is_singular`].
    pub fn inverse(&self) -> Result<Self, MathError> {
        let m = self.rows();
        let ([v0, v1, v2, v3, v4, v5], [t00, t10, t20, t30]) = Self::first_row_cofactors(&m);
        let determinant = t00 * m[0][0] + t10 * m[0][1] + t20 * m[0][2] + t30 * m[0][3];
        if scalar::is_singular(determinant, &self.m.map(|c| Vector4::from(c).magnitude())) {
            return Err(MathError::Singular { determinant });
        }
        let inv_det = 1.0 / determinant;

        let d00 = t00 * inv_det;
        let d10 = t10 * inv_det;
        let d20 = t20 * inv_det;
        let d30 = t30 * inv_det;

        let d01 = -(v5 * m[0][1] - v4 * m[0][2] + v3 * m[0][3]) * inv_det;
        let d11 = (v5 * m[0][0] - v2 * m[0][2] + v1 * m[0][3]) * inv_det;
        let d21 = -(v4 * m[0][0] - v2 * m[0][1] + v0 * m[0][3]) * inv_det;
        let d31 = (v3 * m[0][0] - v1 * m[0][1] + v0 * m[0][2]) * inv_det;

        let v0 = m[1][0] * m[3][1] - m[1][1] * m[3][0];
        let v1 = m[1][0] * m[3][2] - m[1][2] * m[3][0];
        let v2 = m[1][0] * m[3][3] - m[1][3] * m[3][0];
        let v3 = m[1][1] * m[3][2] - m[1][2] * m[3][1];
        let v4 = m[1][1] * m[3][3] - m[1][3] * m[3][1];
        let v5 = m[1][2] * m[3][3] - m[1][3] * m[3][2];

        let d02 = (v5 * m[0][1] - v4 * m[0][2] + v3 * m[0][3]) * inv_det;
        let d12 = -(v5 * m[0][0] - v2 * m[0][2] + v1 * m[0][3]) * inv_det;
        let d22 = (v4 * m[0][0] - v2 * m[0][1] + v0 * m[0][3]) * inv_det;
        let d32 = -(v3 * m[0][0] - v1 * m[0][1] + v0 * m[0][2]) * inv_det;

        let v0 = m[2][1] * m[1][0] - m[2][0] * m[1][1];
        let v1 = m[2][2] * m[1][0] - m[2][0] * m[1][2];
        let v2 = m[2][3] * m[1][0] - m[2][0] * m[1][3];
        let v3 = m[2][2] * m[1][1] - m[2][1] * m[1][2];
        let v4 = m[2][3] * m[1][1] - m[2][1] * m[1][3];
        let v5 = m[2][3] * m[1][2] - m[2][2] * m[1][3];

        let d03 = -(v5 * m[0][1] - v4 * m[0][2] + v3 * m[0][3]) * inv_det;
        let d13 = (v5 * m[0][0] - v2 * m[0][2] + v1 * m[0][3]) * inv_det;
        let d23 = -(v4 * m[0][0] - v2 * m[0][1] + v0 * m[0][3]) * inv_det;
        let d33 = (v3 * m[0][0] - v1 * m[0][1] + v0 * m[0][2]) * inv_det;

        Ok(Self::new(
            d00, d01, d02, d03, d10, d11, d12, d13, d20, d21, d22, d23, d30, d31, d32, d33,
        ))
    }

    /// Transforms a position, dividing by the resulting w.
    pub fn multiply_point(&self, point: Vector3) -> Result<Vector3, MathError> {
        let v = *self * Vector4::new(point.x, point.y, point.z, 1.0);
        if v.w.abs() < W_EPSILON || !v.w.is_finite() {
            return Err(MathError::DegenerateW { w: v.w });
        }
        Ok(v.xyz() / v.w)
    }

    /// Transforms a position by the affine part only, without the divide.
    pub fn multiply_point3x4(&self, point: Vector3) -> Vector3 {
        let [c0, c1, c2, c3] = self.m;
        Vector3::new(
            c0[0] * point.x + c1[0] * point.y + c2[0] * point.z + c3[0],
            c0[1] * point.x + c1[1] * point.y + c2[1] * point.z + c3[1],
            c0[2] * point.x + c1[2] * point.y + c2[2] * point.z + c3[2],
        )
    }

    /// Transforms a direction, translation is ignored.
    pub fn multiply_vector(&self, vector: Vector3) -> Vector3 {
        self.to_matrix3().multiply_vector(vector)
    }

    /// Transforms a plane by multiplying its coefficients with the inverse
    /// transpose of this matrix.
    pub fn transform_plane(&self, plane: Plane) -> Result<Plane, MathError> {
        let inv = self.inverse()?;
        let [c0, c1, c2, c3] = inv.m;
        let n = plane.normal;
        let d = plane.distance;
        let coefficient = |c: [f32; 4]| c[0] * n.x + c[1] * n.y + c[2] * n.z + c[3] * d;

        Plane::from_coefficients(
            coefficient(c0),
            coefficient(c1),
            coefficient(c2),
            coefficient(c3),
        )
    }
}

impl From<Matrix3> for Matrix4 {
    fn from(matrix: Matrix3) -> Self {
        let mut result = Matrix4::IDENTITY;
        for (target, source) in result.m.iter_mut().zip(matrix.m) {
            target[..3].copy_from_slice(&source);
        }
        result
    }
}

/// Flat column-major indexing, panics outside `0..16`.
impl Index<usize> for Matrix4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        assert!(index < 16, "invalid matrix index {index}");
        &self.m[index / 4][index % 4]
    }
}

impl IndexMut<usize> for Matrix4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        assert!(index < 16, "invalid matrix index {index}");
        &mut self.m[index / 4][index % 4]
    }
}

/// `(row, column)` indexing, panics outside `0..4`.
impl Index<(usize, usize)> for Matrix4 {
    type Output = f32;

    fn index(&self, (row, column): (usize, usize)) -> &f32 {
        assert!(row < 4 && column < 4, "invalid matrix index ({row}, {column})");
        &self.m[column][row]
    }
}

impl IndexMut<(usize, usize)> for Matrix4 {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f32 {
        assert!(row < 4 && column < 4, "invalid matrix index ({row}, {column})");
        &mut self.m[column][row]
    }
}

/// Matrix product, `rhs` is applied first.
impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut result = Matrix4::ZERO;
        for (c, column) in result.m.iter_mut().enumerate() {
            for (r, cell) in column.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[k][r] * rhs.m[c][k]).sum();
            }
        }
        result
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, v: Vector4) -> Vector4 {
        let [c0, c1, c2, c3] = self.m;
        let row = |r: usize| c0[r] * v.x + c1[r] * v.y + c2[r] * v.z + c3[r] * v.w;
        Vector4::new(row(0), row(1), row(2), row(3))
    }
}

impl std::fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in 0..4 {
            writeln!(
                f,
                "{:.5}\t{:.5}\t{:.5}\t{:.5}",
                self.m[0][row], self.m[1][row], self.m[2][row], self.m[3][row]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: &Matrix4, b: &Matrix4) -> bool {
        (0..16).all(|i| (a[i] - b[i]).abs() < EPSILON)
    }

    fn sample() -> Matrix4 {
        Matrix4::translate(Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::rotate(Quaternion::euler(10.0, 20.0, 30.0))
    }

    #[test]
    fn test_layout() {
        let m = Matrix4::translate(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[12], 1.0);
        assert_eq!(m.at(1, 3), Ok(2.0));
        assert_eq!(m.get(14), Ok(3.0));
        assert_eq!(m.get_column(3), Ok(Vector4::new(1.0, 2.0, 3.0, 1.0)));
        assert_eq!(m.get_row(2), Ok(Vector4::new(0.0, 0.0, 1.0, 3.0)));
        assert_eq!(m.get_position(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_out_of_range() {
        let mut m = Matrix4::IDENTITY;
        assert_eq!(
            m.get_row(4),
            Err(MathError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            m.set_column(7, Vector4::ONE),
            Err(MathError::IndexOutOfRange { index: 7, len: 4 })
        );
        assert_eq!(
            m.set(16, 1.0),
            Err(MathError::IndexOutOfRange { index: 16, len: 16 })
        );
        assert!(m.is_identity());
    }

    #[test]
    #[should_panic(expected = "invalid matrix index 16")]
    fn test_index_panics() {
        let m = Matrix4::IDENTITY;
        let _ = m[16];
    }

    #[test]
    fn test_new_row_major() {
        let m = Matrix4::new(
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        );
        assert_eq!(m.get_row(1), Ok(Vector4::new(5.0, 6.0, 7.0, 8.0)));
        assert_eq!(m.transpose().get_column(1), Ok(Vector4::new(5.0, 6.0, 7.0, 8.0)));
        assert_eq!(m.determinant(), 0.0);
        assert!(m.inverse().is_err());
    }

    #[test]
    fn test_set_row_column() {
        let mut m = Matrix4::ZERO;
        m.set_row(0, Vector4::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        m.set_column(3, Vector4::new(9.0, 9.0, 9.0, 9.0)).unwrap();
        m.set_at(3, 0, 5.0).unwrap();
        assert_eq!(m.get_row(0), Ok(Vector4::new(1.0, 2.0, 3.0, 9.0)));
        assert_eq!(m.get_column(0), Ok(Vector4::new(1.0, 0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_composition_order() {
        let translate = Matrix4::translate(Vector3::new(10.0, 0.0, 0.0));
        let rotate = Matrix4::rotate(Quaternion::euler(0.0, 0.0, 90.0));
        let point = Vector3::RIGHT;

        let rotated_then_moved = (translate * rotate).multiply_point3x4(point);
        assert!(rotated_then_moved.approx_eq(Vector3::new(10.0, 1.0, 0.0), EPSILON));

        let moved_then_rotated = (rotate * translate).multiply_point3x4(point);
        assert!(moved_then_rotated.approx_eq(Vector3::new(0.0, 11.0, 0.0), EPSILON));
    }

    #[test]
    fn test_trs() {
        let t = Vector3::new(1.0, 2.0, 3.0);
        let r = Quaternion::euler(10.0, 20.0, 30.0);
        let s = Vector3::new(2.0, 3.0, 4.0);
        let expected = Matrix4::translate(t) * Matrix4::rotate(r) * Matrix4::scale(s);
        let trs = Matrix4::trs(t, r, s);
        assert!(approx_eq(&trs, &expected));
        assert!(trs.lossy_scale().approx_eq(s, EPSILON));
        assert_eq!(trs.rotation(), r);
        assert_eq!(trs.get_position(), t);
    }

    #[test]
    fn test_lossy_scale_mirrored() {
        let m = Matrix4::scale(Vector3::new(-2.0, 1.0, 1.0));
        assert!(m.lossy_scale().approx_eq(Vector3::new(-2.0, 1.0, 1.0), EPSILON));
    }

    #[test]
    fn test_inverse() {
        let m = sample();
        let inverse = m.inverse().unwrap();
        assert!(approx_eq(&(m * inverse), &Matrix4::IDENTITY));
        assert!(approx_eq(&(inverse * m), &Matrix4::IDENTITY));
        assert!(approx_eq(&inverse.inverse().unwrap(), &m));
        let det = m.determinant();
        assert!((det - 1.0).abs() < EPSILON, "determinant {det}");
    }

    #[test]
    fn test_inverse_with_projection() {
        let m = Matrix4::perspective(60.0, 1.5, 0.1, 100.0).unwrap();
        let inverse = m.inverse().unwrap();
        assert!(approx_eq(&(m * inverse), &Matrix4::IDENTITY));
    }

    #[test]
    fn test_inverse_singular() {
        let result = Matrix4::scale(Vector3::new(1.0, 1.0, 0.0)).inverse();
        assert!(matches!(result, Err(MathError::Singular { .. })));
        let result = Matrix4::ZERO.inverse();
        assert_eq!(result, Err(MathError::Singular { determinant: 0.0 }));
    }

    /// Third row is 0.3 * first + 0.7 * second.
    #[rustfmt::skip]
    fn rank_deficient() -> Matrix4 {
        Matrix4::new(
            1.0, 2.0, 0.0, 1.0,
            0.0, 1.0, 3.0, 2.0,
            0.3, 1.3, 2.1, 1.7,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[test]
    fn test_inverse_rank_deficient() {
        let m = rank_deficient();
        assert!(m.determinant().abs() < 1e-5);
        assert!(matches!(m.inverse(), Err(MathError::Singular { .. })));
        let scaled = Matrix4::scale(Vector3::new(100.0, 100.0, 100.0)) * m;
        assert!(matches!(scaled.inverse(), Err(MathError::Singular { .. })));
    }

    #[test]
    fn test_inverse_tiny_scale() {
        let m = Matrix4::trs(
            Vector3::ZERO,
            Quaternion::euler(0.0, 30.0, 0.0),
            Vector3::new(1e-6, 1e-6, 1e-6),
        );
        let inverse = m.inverse().unwrap();
        let p = Vector3::new(2.0, -1.0, 3.0);
        let back = inverse.multiply_point3x4(m.multiply_point3x4(p));
        assert!((back - p).magnitude() < 1e-4, "{back}");
    }

    #[test]
    fn test_multiply_point() {
        let m = sample();
        let p = Vector3::new(3.0, -1.0, 2.0);
        assert!(
            m.multiply_point(p)
                .unwrap()
                .approx_eq(m.multiply_point3x4(p), EPSILON)
        );
    }

    #[test]
    fn test_multiply_point_degenerate_w() {
        let m = Matrix4::perspective(90.0, 1.0, 1.0, 10.0).unwrap();
        // a point on the camera plane has w = 0
        let result = m.multiply_point(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(result, Err(MathError::DegenerateW { w: 0.0 }));
    }

    #[test]
    fn test_multiply_vector_ignores_translation() {
        let m = Matrix4::translate(Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(m.multiply_vector(Vector3::UP), Vector3::UP);
        assert_eq!(m.multiply_point3x4(Vector3::UP), Vector3::new(5.0, 6.0, 5.0));
    }

    #[test]
    fn test_perspective_depth_range() {
        let m = Matrix4::perspective(60.0, 16.0 / 9.0, 0.5, 50.0).unwrap();
        let near = m.multiply_point(Vector3::new(0.0, 0.0, -0.5)).unwrap();
        let far = m.multiply_point(Vector3::new(0.0, 0.0, -50.0)).unwrap();
        assert!((near.z + 1.0).abs() < EPSILON, "near {near}");
        assert!((far.z - 1.0).abs() < EPSILON, "far {far}");
    }

    #[test]
    fn test_perspective_invalid() {
        assert!(Matrix4::perspective(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(Matrix4::perspective(60.0, 0.0, 0.1, 10.0).is_err());
        assert!(Matrix4::perspective(60.0, 1.0, 0.0, 10.0).is_err());
        assert!(Matrix4::perspective(60.0, 1.0, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_orthographic() {
        let m = Matrix4::orthographic(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0).unwrap();
        let corner = m.multiply_point(Vector3::new(2.0, 1.0, -10.0)).unwrap();
        assert!(corner.approx_eq(Vector3::new(1.0, 1.0, 1.0), EPSILON));
        assert_eq!(
            Matrix4::orthographic(1.0, 1.0, -1.0, 1.0, 0.0, 10.0),
            Err(MathError::InvalidProjection("empty view volume"))
        );
    }

    #[test]
    fn test_look_at() {
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let view = Matrix4::look_at(eye, Vector3::ZERO, Vector3::UP).unwrap();
        // the eye ends up in the origin, the target straight ahead on -Z
        assert!(view.multiply_point3x4(eye).approx_eq(Vector3::ZERO, EPSILON));
        assert!(
            view.multiply_point3x4(Vector3::ZERO)
                .approx_eq(Vector3::new(0.0, 0.0, -5.0), EPSILON)
        );
        assert!(Matrix4::look_at(eye, eye, Vector3::UP).is_err());
        assert!(Matrix4::look_at(Vector3::ZERO, Vector3::UP, Vector3::UP).is_err());
    }

    #[test]
    fn test_transform_plane() {
        let plane = Plane::new(Vector3::UP, 0.0);
        let moved = Matrix4::translate(Vector3::new(0.0, 5.0, 0.0))
            .transform_plane(plane)
            .unwrap();
        assert!(moved.normal.approx_eq(Vector3::UP, EPSILON));
        assert!((moved.distance + 5.0).abs() < EPSILON);
        assert!(moved.get_distance_to_point(Vector3::new(3.0, 5.0, -2.0)).abs() < EPSILON);

        let m = sample();
        let transformed = m.transform_plane(plane).unwrap();
        let point = m.multiply_point3x4(Vector3::new(4.0, 0.0, -7.0));
        assert!(transformed.get_distance_to_point(point).abs() < EPSILON);
    }

    #[test]
    fn test_transform_plane_singular() {
        let result = Matrix4::ZERO.transform_plane(Plane::new(Vector3::UP, 1.0));
        assert!(matches!(result, Err(MathError::Singular { .. })));
        let result = rank_deficient().transform_plane(Plane::new(Vector3::UP, 1.0));
        assert!(matches!(result, Err(MathError::Singular { .. })));
    }

    #[test]
    fn test_from_matrix3() {
        let m: Matrix4 = Matrix3::scale(Vector3::new(2.0, 3.0, 4.0)).into();
        assert_eq!(m, Matrix4::scale(Vector3::new(2.0, 3.0, 4.0)));
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(m.to_matrix3(), Matrix3::scale(Vector3::new(2.0, 3.0, 4.0)));
    }
}
