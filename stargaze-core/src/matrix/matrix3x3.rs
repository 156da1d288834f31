//! 3x3 matrices for reference-frame transformations.
//!
//! The pointing model relates three frames — celestial, phone, and local
//! horizontal — and every transform between them is a 3x3 matrix built from
//! frame axis vectors. Two properties are exploited throughout:
//!
//! - A frame matrix built from three orthonormal axis vectors is orthogonal,
//!   so its inverse is its transpose. Constructing from **row** vectors
//!   instead of column vectors therefore yields the inverse directly, with
//!   no arithmetic at all — see [`Matrix3x3::from_vectors`].
//! - Rotation about an arbitrary unit axis (the magnetic-declination
//!   correction about the zenith, screen rotation about the line of sight)
//!   is the Rodrigues matrix, built once per change rather than per frame —
//!   see [`Matrix3x3::from_rotation`].
//!
//! Storage is row-major `[[f64; 3]; 3]`; [`transform`](Matrix3x3::transform)
//! is the standard matrix-times-column-vector product.

use super::Vector3;
use crate::constants::DEGREES_TO_RADIANS;
use std::fmt;

/// A 3x3 matrix, usually a rotation or an orthonormal frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix3x3 {
    elements: [[f64; 3]; 3],
}

impl Matrix3x3 {
    /// Creates a matrix from a row-major 3x3 array.
    pub fn from_array(elements: [[f64; 3]; 3]) -> Self {
        Self { elements }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// The zero matrix.
    pub fn zeros() -> Self {
        Self::from_array([[0.0; 3]; 3])
    }

    /// Creates a matrix from three vectors.
    ///
    /// With `columns == true` the vectors become the matrix columns; with
    /// `columns == false` they become the rows. For an orthonormal frame
    /// `[n, u, e]` the row form is the transpose — and hence the inverse —
    /// of the column form, which is how the model inverts its phone-frame
    /// axes without a general inversion.
    pub fn from_vectors(v1: Vector3, v2: Vector3, v3: Vector3, columns: bool) -> Self {
        if columns {
            Self::from_array([
                [v1.x, v2.x, v3.x],
                [v1.y, v2.y, v3.y],
                [v1.z, v2.z, v3.z],
            ])
        } else {
            Self::from_array([
                [v1.x, v1.y, v1.z],
                [v2.x, v2.y, v2.z],
                [v3.x, v3.y, v3.z],
            ])
        }
    }

    /// Creates a matrix whose columns are the given vectors.
    pub fn from_columns(v1: Vector3, v2: Vector3, v3: Vector3) -> Self {
        Self::from_vectors(v1, v2, v3, true)
    }

    /// Creates a matrix whose rows are the given vectors.
    pub fn from_rows(v1: Vector3, v2: Vector3, v3: Vector3) -> Self {
        Self::from_vectors(v1, v2, v3, false)
    }

    /// Builds the Rodrigues rotation matrix for a right-handed rotation by
    /// `degrees` about `axis`.
    ///
    /// `axis` must be a unit vector; the result is meaningless otherwise.
    /// Right-handed means counterclockwise when looking down the axis toward
    /// the origin: rotating `x_axis` by +90 degrees about `z_axis` gives
    /// `y_axis`.
    pub fn from_rotation(degrees: f64, axis: Vector3) -> Self {
        let (sin_d, cos_d) = libm::sincos(degrees * DEGREES_TO_RADIANS);
        let one_minus_cos = 1.0 - cos_d;

        let Vector3 { x, y, z } = axis;

        let xs = x * sin_d;
        let ys = y * sin_d;
        let zs = z * sin_d;

        let xm = x * one_minus_cos;
        let ym = y * one_minus_cos;
        let zm = z * one_minus_cos;

        let xym = x * ym;
        let yzm = y * zm;
        let zxm = z * xm;

        Self::from_array([
            [x * xm + cos_d, xym - zs, zxm + ys],
            [xym + zs, y * ym + cos_d, yzm - xs],
            [zxm - ys, yzm + xs, z * zm + cos_d],
        ])
    }

    /// Returns the element at `(row, col)`, 0-based.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.elements[row][col]
    }

    /// Returns the given row as a vector.
    pub fn row(&self, row: usize) -> Vector3 {
        Vector3::from_array(self.elements[row])
    }

    /// Multiplies this matrix by another: `self * other`.
    ///
    /// Composition order is the usual one — `other` acts on a vector first.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = [[0.0; 3]; 3];

        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                for k in 0..3 {
                    *cell += self.elements[i][k] * other.elements[k][j];
                }
            }
        }

        Self::from_array(result)
    }

    /// Applies this matrix to a column vector: `self * v`.
    pub fn transform(&self, v: Vector3) -> Vector3 {
        let m = &self.elements;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Returns the transpose.
    ///
    /// For an orthogonal matrix this equals the inverse and is the
    /// numerically stable way to get it.
    pub fn transpose(&self) -> Self {
        let m = &self.elements;
        Self::from_array([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.elements;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse, or `None` if the matrix is singular.
    ///
    /// Frame matrices in the pointing model are orthogonal and never
    /// singular; the check costs one comparison.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        let m = &self.elements;

        Some(Self::from_array([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ]))
    }

    /// Returns the largest absolute element-wise difference from `other`.
    /// Handy in tests comparing against expected rotations.
    pub fn max_difference(&self, other: &Self) -> f64 {
        let mut max_diff: f64 = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                let diff = (self.elements[i][j] - other.elements[i][j]).abs();
                max_diff = max_diff.max(diff);
            }
        }
        max_diff
    }
}

impl std::ops::Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl std::ops::Mul<Vector3> for Matrix3x3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.transform(v)
    }
}

impl std::ops::Mul<Vector3> for &Matrix3x3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.transform(v)
    }
}

impl std::ops::Index<(usize, usize)> for Matrix3x3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.elements[row][col]
    }
}

impl fmt::Display for Matrix3x3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix3x3:")?;
        for row in &self.elements {
            writeln!(f, "  [{:12.9} {:12.9} {:12.9}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}
