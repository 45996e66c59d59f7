//! 3x3 matrix type for covariances, rotations and frames.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | m00*x + m01*y + m02*z |
//! | m10 m11 m12 | * | y | = | m10*x + m11*y + m12*z |
//! | m20 m21 m22 |   | z |   | m20*x + m21*y + m22*z |
//! ```
//!
//! Bases and eigenvector sets are column-addressed: column `i` is axis `i`,
//! read with [`Mat3::col`] and written with [`Mat3::set_col`].
//!
//! # Usage
//!
//! ```rust
//! use basis_math::{Mat3, Vec3};
//!
//! let frame = Mat3::from_col_vecs(Vec3::Y, Vec3::Z, Vec3::X);
//! assert_eq!(frame.col(0), Vec3::Y);
//! assert_eq!(frame * Vec3::X, Vec3::Y);
//! ```

use crate::Vec3;
use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::ops::{Index, Mul};

/// A 3x3 `f32` matrix.
///
/// Stored in row-major order. Use [`Mat3::from_rows`] or [`Mat3::from_cols`]
/// to construct from component arrays.
///
/// # Example
///
/// ```rust
/// use basis_math::{Mat3, Vec3};
///
/// let identity = Mat3::IDENTITY;
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// assert_eq!(identity * v, v);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements in row-major order: [row0, row1, row2]
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Zero matrix.
    pub const ZERO: Self = Self {
        m: [[0.0; 3]; 3],
    };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from column arrays.
    ///
    /// Transposes the input (columns become rows internally).
    #[inline]
    pub const fn from_cols(cols: [[f32; 3]; 3]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0]],
                [cols[0][1], cols[1][1], cols[2][1]],
                [cols[0][2], cols[1][2], cols[2][2]],
            ],
        }
    }

    /// Creates a matrix from Vec3 columns.
    #[inline]
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_cols([c0.to_array(), c1.to_array(), c2.to_array()])
    }

    /// Creates a diagonal matrix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use basis_math::Mat3;
    ///
    /// let spread = Mat3::diagonal(0.5, 2.0, 0.0);
    /// assert!(spread.is_diagonal(0.0));
    /// ```
    #[inline]
    pub const fn diagonal(d0: f32, d1: f32, d2: f32) -> Self {
        Self::from_rows([
            [d0, 0.0, 0.0],
            [0.0, d1, 0.0],
            [0.0, 0.0, d2],
        ])
    }

    /// Creates a diagonal matrix from a vector.
    #[inline]
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self::diagonal(d.x, d.y, d.z)
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    /// Sets the element at `row`, `col`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row][col] = value;
    }

    /// Returns a row as Vec3.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.m[i])
    }

    /// Returns a column as Vec3.
    #[inline]
    pub fn col(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[0][i], self.m[1][i], self.m[2][i])
    }

    /// Overwrites a column.
    #[inline]
    pub fn set_col(&mut self, i: usize, v: Vec3) {
        self.m[0][i] = v.x;
        self.m[1][i] = v.y;
        self.m[2][i] = v.z;
    }

    /// Returns the main diagonal as Vec3.
    #[inline]
    pub fn diagonal_vec(&self) -> Vec3 {
        Vec3::new(self.m[0][0], self.m[1][1], self.m[2][2])
    }

    /// Sum of the diagonal elements.
    #[inline]
    pub fn trace(&self) -> f32 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows([
            [self.m[0][0], self.m[1][0], self.m[2][0]],
            [self.m[0][1], self.m[1][1], self.m[2][1]],
            [self.m[0][2], self.m[1][2], self.m[2][2]],
        ])
    }

    /// Computes the determinant.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Transforms a Vec3 by this matrix.
    ///
    /// Equivalent to `matrix * vector`.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }

    /// Multiplies two matrices.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        result
    }

    /// Returns true if all elements are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m
            .iter()
            .flatten()
            .all(|x| x.is_finite())
    }

    /// Largest absolute element.
    #[inline]
    pub fn max_abs_element(&self) -> f32 {
        self.m
            .iter()
            .flatten()
            .fold(0.0f32, |acc, x| acc.max(x.abs()))
    }

    /// Returns true if every off-diagonal element is within `eps` of zero.
    pub fn is_diagonal(&self, eps: f32) -> bool {
        (0..3).all(|i| (0..3).all(|j| i == j || self.m[i][j].abs() <= eps))
    }

    /// Returns true if `m[i][j]` and `m[j][i]` agree within `eps`.
    pub fn is_symmetric(&self, eps: f32) -> bool {
        (self.m[0][1] - self.m[1][0]).abs() <= eps
            && (self.m[0][2] - self.m[2][0]).abs() <= eps
            && (self.m[1][2] - self.m[2][1]).abs() <= eps
    }

    /// Sum of squared off-diagonal elements.
    pub fn off_diagonal_norm_squared(&self) -> f32 {
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    sum += self.m[i][j] * self.m[i][j];
                }
            }
        }
        sum
    }

    /// Converts to glam Mat3 (column-major).
    #[inline]
    pub fn to_glam(&self) -> glam::Mat3 {
        glam::Mat3::from_cols(
            self.col(0).to_glam(),
            self.col(1).to_glam(),
            self.col(2).to_glam(),
        )
    }

    /// Creates from glam Mat3.
    #[inline]
    pub fn from_glam(m: glam::Mat3) -> Self {
        let cols = m.to_cols_array_2d();
        Self::from_cols([cols[0], cols[1], cols[2]])
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Mat3 * Vec3
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}

// Mat3 * Mat3
impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

// Mat3 * f32
impl Mul<f32> for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        let mut out = self;
        out.m.iter_mut().flatten().for_each(|x| *x *= rhs);
        out
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f32; 3] {
        &self.m[i]
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
