//! 3x3 matrices for rotations and scales
//!
//! Storage is column-major: `m[column][row]`, and the flat index of
//! `(row, column)` is `row + column * 3`. Vectors are columns, so for
//! `(A * B) * v` the matrix `B` is applied first, then `A`.

use crate::error::{MathError, check_index};
use crate::math::quaternion::Quaternion;
use crate::math::scalar;
use crate::math::vec::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Mul};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    /// Column-major data, `m[column][row]`
    pub m: [[f32; 3]; 3],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const ZERO: Matrix3 = Matrix3 { m: [[0.0; 3]; 3] };

    pub const IDENTITY: Matrix3 = Matrix3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Create a matrix from entries given row by row, the way it is written
    /// on paper.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m20: f32,
        m21: f32,
        m22: f32,
    ) -> Self {
        Self {
            m: [[m00, m10, m20], [m01, m11, m21], [m02, m12, m22]],
        }
    }

    pub const fn from_columns(column0: Vector3, column1: Vector3, column2: Vector3) -> Self {
        Self {
            m: [
                [column0.x, column0.y, column0.z],
                [column1.x, column1.y, column1.z],
                [column2.x, column2.y, column2.z],
            ],
        }
    }

    /// Entry at `(row, column)`.
    pub fn at(&self, row: usize, column: usize) -> Result<f32, MathError> {
        Ok(self.m[check_index(column, 3)?][check_index(row, 3)?])
    }

    pub fn set_at(&mut self, row: usize, column: usize, value: f32) -> Result<(), MathError> {
        self.m[check_index(column, 3)?][check_index(row, 3)?] = value;
        Ok(())
    }

    /// Entry at flat column-major `index`.
    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        check_index(index, 9).map(|i| self[i])
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        let i = check_index(index, 9)?;
        self[i] = value;
        Ok(())
    }

    pub fn get_column(&self, index: usize) -> Result<Vector3, MathError> {
        let [x, y, z] = self.m[check_index(index, 3)?];
        Ok(Vector3::new(x, y, z))
    }

    pub fn get_row(&self, index: usize) -> Result<Vector3, MathError> {
        let row = check_index(index, 3)?;
        Ok(Vector3::new(self.m[0][row], self.m[1][row], self.m[2][row]))
    }

    pub fn set_column(&mut self, index: usize, column: Vector3) -> Result<(), MathError> {
        self.m[check_index(index, 3)?] = column.to_array();
        Ok(())
    }

    pub fn set_row(&mut self, index: usize, row: Vector3) -> Result<(), MathError> {
        let r = check_index(index, 3)?;
        for (column, value) in self.m.iter_mut().zip(row.to_array()) {
            column[r] = value;
        }
        Ok(())
    }

    /// Non-uniform scale matrix.
    pub const fn scale(vector: Vector3) -> Self {
        Self::new(
            vector.x, 0.0, 0.0, 0.0, vector.y, 0.0, 0.0, 0.0, vector.z,
        )
    }

    /// Rotation matrix for a unit quaternion.
    pub fn rotate(q: Quaternion) -> Self {
        let x2 = q.x * 2.0;
        let y2 = q.y * 2.0;
        let z2 = q.z * 2.0;
        let xx = q.x * x2;
        let yy = q.y * y2;
        let zz = q.z * z2;
        let xy = q.x * y2;
        let xz = q.x * z2;
        let yz = q.y * z2;
        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        Self::new(
            1.0 - (yy + zz),
            xy - wz,
            xz + wy,
            xy + wz,
            1.0 - (xx + zz),
            yz - wx,
            xz - wy,
            yz + wx,
            1.0 - (xx + yy),
        )
    }

    /// Quaternion of a pure rotation matrix.
    ///
    /// Picks the largest of `w, x, y, z` to divide by, so the result is
    /// stable for every rotation angle.
    pub fn to_quaternion(&self) -> Quaternion {
        let m = |row: usize, column: usize| self.m[column][row];
        let trace = m(0, 0) + m(1, 1) + m(2, 2);

        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Quaternion::new(
                (m(2, 1) - m(1, 2)) / s,
                (m(0, 2) - m(2, 0)) / s,
                (m(1, 0) - m(0, 1)) / s,
                0.25 * s,
            )
        } else if m(0, 0) > m(1, 1) && m(0, 0) > m(2, 2) {
            let s = (1.0 + m(0, 0) - m(1, 1) - m(2, 2)).sqrt() * 2.0;
            Quaternion::new(
                0.25 * s,
                (m(0, 1) + m(1, 0)) / s,
                (m(0, 2) + m(2, 0)) / s,
                (m(2, 1) - m(1, 2)) / s,
            )
        } else if m(1, 1) > m(2, 2) {
            let s = (1.0 + m(1, 1) - m(0, 0) - m(2, 2)).sqrt() * 2.0;
            Quaternion::new(
                (m(0, 1) + m(1, 0)) / s,
                0.25 * s,
                (m(1, 2) + m(2, 1)) / s,
                (m(0, 2) - m(2, 0)) / s,
            )
        } else {
            let s = (1.0 + m(2, 2) - m(0, 0) - m(1, 1)).sqrt() * 2.0;
            Quaternion::new(
                (m(0, 2) + m(2, 0)) / s,
                (m(1, 2) + m(2, 1)) / s,
                0.25 * s,
                (m(1, 0) - m(0, 1)) / s,
            )
        };
        q.normalized()
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

    pub fn determinant(&self) -> f32 {
        let [a, b, c] = self.m;
        a[0] * (b[1] * c[2] - c[1] * b[2]) - b[0] * (a[1] * c[2] - c[1] * a[2])
            + c[0] * (a[1] * b[2] - b[1] * a[2])
    }

    /// Inverse through the adjugate, fails for (nearly) singular matrices.
    ///
    /// See [`scalar::is_singular`] for the tolerance.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if scalar::is_singular(determinant, &self.m.map(|c| Vector3::from(c).magnitude())) {
            return Err(MathError::Singular { determinant });
        }
        let inv_det = 1.0 / determinant;
        let m = |row: usize, column: usize| self.m[column][row];

        Ok(Self::new(
            (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1)) * inv_det,
            (m(0, 2) * m(2, 1) - m(0, 1) * m(2, 2)) * inv_det,
            (m(0, 1) * m(1, 2) - m(0, 2) * m(1, 1)) * inv_det,
            (m(1, 2) * m(2, 0) - m(1, 0) * m(2, 2)) * inv_det,
            (m(0, 0) * m(2, 2) - m(0, 2) * m(2, 0)) * inv_det,
            (m(0, 2) * m(1, 0) - m(0, 0) * m(1, 2)) * inv_det,
            (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0)) * inv_det,
            (m(0, 1) * m(2, 0) - m(0, 0) * m(2, 1)) * inv_det,
            (m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0)) * inv_det,
        ))
    }

    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let [c0, c1, c2] = self.m;
        Vector3::new(
            c0[0] * v.x + c1[0] * v.y + c2[0] * v.z,
            c0[1] * v.x + c1[1] * v.y + c2[1] * v.z,
            c0[2] * v.x + c1[2] * v.y + c2[2] * v.z,
        )
    }
}

/// Flat column-major indexing, panics outside `0..9`.
impl Index<usize> for Matrix3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        assert!(index < 9, "invalid matrix index {index}");
        &self.m[index / 3][index % 3]
    }
}

impl IndexMut<usize> for Matrix3 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        assert!(index < 9, "invalid matrix index {index}");
        &mut self.m[index / 3][index % 3]
    }
}

/// `(row, column)` indexing, panics outside `0..3`.
impl Index<(usize, usize)> for Matrix3 {
    type Output = f32;

    fn index(&self, (row, column): (usize, usize)) -> &f32 {
        assert!(row < 3 && column < 3, "invalid matrix index ({row}, {column})");
        &self.m[column][row]
    }
}

impl IndexMut<(usize, usize)> for Matrix3 {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f32 {
        assert!(row < 3 && column < 3, "invalid matrix index ({row}, {column})");
        &mut self.m[column][row]
    }
}

/// Matrix product, `rhs` is applied first.
impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut result = Matrix3::ZERO;
        for (c, column) in result.m.iter_mut().enumerate() {
            for (r, cell) in column.iter_mut().enumerate() {
                *cell = self.m[0][r] * rhs.m[c][0]
                    + self.m[1][r] * rhs.m[c][1]
                    + self.m[2][r] * rhs.m[c][2];
            }
        }
        result
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.multiply_vector(v)
    }
}

impl std::fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in 0..3 {
            writeln!(
                f,
                "{:.5}\t{:.5}\t{:.5}",
                self.m[0][row], self.m[1][row], self.m[2][row]
            )?;
        }
        Ok(())
    }
}
