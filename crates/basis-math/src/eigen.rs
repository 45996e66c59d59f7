//! Eigen decomposition of symmetric 3x3 matrices by Jacobi rotation.
//!
//! [`diagonalize`] turns a symmetric matrix (typically a covariance from
//! [`covariance`](crate::covariance)) into an orthonormal eigenvector basis
//! and the matching eigenvalues. This is the principal component analysis
//! step of basis extraction.
//!
//! # Algorithm
//!
//! Classical (greedy) Jacobi iteration. Starting from `basis = I` and
//! `spread = C`, each step:
//!
//! 1. picks the largest off-diagonal pair `(p, q)` among `yz`, `xz`, `xy`;
//! 2. derives the rotation from
//!    `beta = (s_pp - s_qq) / (2 s_pq)`,
//!    `t = sign(beta) / (|beta| + sqrt(beta^2 + 1))`,
//!    `c = 1 / sqrt(t^2 + 1)`, `s = c t`;
//! 3. applies the similarity transform `basis <- basis R`,
//!    `spread <- R^T spread R`, which zeroes `s_pq`.
//!
//! Iteration stops once every off-diagonal element is within tolerance, or
//! after [`JacobiConfig::max_iterations`] rotations. Running out of
//! iterations is not an error: the best approximation is returned with
//! [`Eigen3::converged`] cleared and a warning logged.
//!
//! # Ordering
//!
//! Columns and eigenvalues come back in whatever order the rotations leave
//! them, always index-matched. Use [`Eigen3::sorted_descending`] to order
//! by decreasing eigenvalue.
//!
//! # Usage
//!
//! ```rust
//! use basis_math::{Eigen3, Mat3, Vec3};
//!
//! let cov = Mat3::from_rows([
//!     [2.0, 1.0, 0.0],
//!     [1.0, 2.0, 0.0],
//!     [0.0, 0.0, 0.5],
//! ]);
//! let eigen = Eigen3::new(&cov).unwrap().sorted_descending();
//! assert!((eigen.eigenvalues.x - 3.0).abs() < 1e-4);
//! assert!((eigen.eigenvalues.y - 1.0).abs() < 1e-4);
//! assert!((eigen.eigenvalues.z - 0.5).abs() < 1e-4);
//! ```

use crate::{Mat3, Vec3};
use basis_core::{Error, JacobiConfig, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Off-diagonal pivot candidates, in selection order.
const PIVOTS: [(usize, usize); 3] = [(1, 2), (0, 2), (0, 1)];

/// Result of diagonalizing a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eigen3 {
    /// Eigenvectors as columns; unit length, mutually orthogonal, right-handed.
    pub basis: Mat3,
    /// Eigenvalues; component `i` belongs to column `i` of `basis`.
    ///
    /// Absolute values after any rotation. An input that is already diagonal
    /// comes back with its diagonal unchanged, signs included.
    pub eigenvalues: Vec3,
    /// Number of rotations applied.
    pub iterations: usize,
    /// False when the iteration cap was hit before reaching tolerance.
    pub converged: bool,
}

impl Eigen3 {
    /// Diagonalizes `matrix` with the default [`JacobiConfig`].
    #[inline]
    pub fn new(matrix: &Mat3) -> Result<Self> {
        diagonalize(matrix, &JacobiConfig::default())
    }

    /// Eigenvector `i` (column `i` of the basis).
    #[inline]
    pub fn eigenvector(&self, i: usize) -> Vec3 {
        self.basis.col(i)
    }

    /// Reorders columns and eigenvalues by decreasing eigenvalue.
    ///
    /// The last column is negated when the reordering is an odd
    /// permutation, so the basis stays right-handed.
    pub fn sorted_descending(&self) -> Self {
        let ev = self.eigenvalues;
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| ev[b].total_cmp(&ev[a]));

        let inversions = (0..3)
            .flat_map(|i| (i + 1..3).map(move |j| (i, j)))
            .filter(|&(i, j)| order[i] > order[j])
            .count();

        let mut basis = Mat3::ZERO;
        let mut eigenvalues = Vec3::ZERO;
        for (slot, &src) in order.iter().enumerate() {
            basis.set_col(slot, self.basis.col(src));
            eigenvalues[slot] = ev[src];
        }
        if inversions % 2 == 1 {
            basis.set_col(2, -basis.col(2));
        }

        Self {
            basis,
            eigenvalues,
            ..*self
        }
    }

    /// Number of eigenvalues larger than `rel_eps` times the largest one.
    ///
    /// A point set spread along a line has rank 1, a planar one rank 2.
    pub fn rank(&self, rel_eps: f32) -> usize {
        let largest = self.eigenvalues.max_element();
        if largest <= 0.0 {
            return 0;
        }
        let threshold = largest * rel_eps;
        (0..3).filter(|&i| self.eigenvalues[i] > threshold).count()
    }

    /// Rebuilds `basis * diag(eigenvalues) * basis^T`.
    pub fn reconstruct(&self) -> Mat3 {
        self.basis * Mat3::from_diagonal(self.eigenvalues) * self.basis.transpose()
    }
}

/// A Jacobi plane rotation zeroing the `(p, q)` element of a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRotation {
    /// First index of the pivot, `p < q`.
    pub p: usize,
    /// Second index of the pivot.
    pub q: usize,
    /// Cosine of the rotation angle.
    pub cos: f32,
    /// Sine of the rotation angle.
    pub sin: f32,
}

impl PlaneRotation {
    /// Picks the largest off-diagonal element of `spread` and builds the
    /// rotation eliminating it.
    ///
    /// Returns `None` when every off-diagonal element is exactly zero.
    pub fn for_pivot(spread: &Mat3) -> Option<Self> {
        let mut pivot = PIVOTS[0];
        let mut largest = spread.get(pivot.0, pivot.1).abs();
        for &(p, q) in &PIVOTS[1..] {
            let v = spread.get(p, q).abs();
            if v > largest {
                largest = v;
                pivot = (p, q);
            }
        }
        if largest == 0.0 {
            return None;
        }

        let (p, q) = pivot;
        let beta = (spread.get(p, p) - spread.get(q, q)) / (2.0 * spread.get(p, q));
        let sign = if beta < 0.0 { -1.0 } else { 1.0 };
        let tan = sign / (beta.abs() + beta.hypot(1.0));
        let cos = 1.0 / tan.hypot(1.0);
        let sin = cos * tan;
        Some(Self { p, q, cos, sin })
    }

    /// Rotation matrix: identity except for the `p`/`q` plane.
    ///
    /// Column `p` is `cos e_p + sin e_q`, column `q` is `-sin e_p + cos e_q`.
    pub fn matrix(&self) -> Mat3 {
        let mut r = Mat3::IDENTITY;
        r.set(self.p, self.p, self.cos);
        r.set(self.q, self.q, self.cos);
        r.set(self.q, self.p, self.sin);
        r.set(self.p, self.q, -self.sin);
        r
    }

    /// Applies the similarity transform, returning the new `(spread, basis)`.
    pub fn apply(&self, spread: &Mat3, basis: &Mat3) -> (Mat3, Mat3) {
        let r = self.matrix();
        let spread = r.transpose() * (*spread * r);
        let basis = *basis * r;
        (spread, basis)
    }
}

/// Diagonalizes a symmetric matrix by Jacobi rotations.
///
/// The tolerance is relative: off-diagonal elements count as zero once they
/// fall below `config.tolerance` times the largest absolute input element.
///
/// A matrix that is already diagonal within tolerance returns the identity
/// basis and its own diagonal. Otherwise eigenvalues are reported as absolute
/// values.
///
/// # Errors
///
/// [`Error::NonFinite`] if `matrix` contains NaN or infinite values; nothing
/// is computed in that case.
pub fn diagonalize(matrix: &Mat3, config: &JacobiConfig) -> Result<Eigen3> {
    if !matrix.is_finite() {
        return Err(Error::non_finite("covariance"));
    }

    let tol = config.tolerance * matrix.max_abs_element();
    let mut basis = Mat3::IDENTITY;
    let mut spread = *matrix;
    let mut iterations = 0;
    let mut converged = spread.is_diagonal(tol);

    while !converged && iterations < config.max_iterations {
        let Some(rot) = PlaneRotation::for_pivot(&spread) else {
            converged = true;
            break;
        };
        (spread, basis) = rot.apply(&spread, &basis);
        iterations += 1;
        trace!(iterations, p = rot.p, q = rot.q, cos = rot.cos, sin = rot.sin, "jacobi rotation");
        converged = spread.is_diagonal(tol);
    }

    if converged {
        debug!(iterations, "jacobi converged");
    } else {
        warn!(
            iterations,
            residual = spread.off_diagonal_norm_squared().sqrt(),
            "jacobi hit the iteration cap, returning approximate basis"
        );
    }

    // an untouched diagonal is returned as given
    let eigenvalues = if iterations == 0 {
        spread.diagonal_vec()
    } else {
        spread.diagonal_vec().abs()
    };

    Ok(Eigen3 {
        basis,
        eigenvalues,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rotation(axis: Vec3, angle: f32) -> Mat3 {
        Mat3::from_glam(glam::Mat3::from_axis_angle(axis.normalize().to_glam(), angle))
    }

    fn rotated_spread(r: &Mat3, d: Vec3) -> Mat3 {
        *r * Mat3::from_diagonal(d) * r.transpose()
    }

    fn assert_orthonormal(m: &Mat3, eps: f32) {
        for i in 0..3 {
            assert_abs_diff_eq!(m.col(i).length(), 1.0, epsilon = eps);
            for j in (i + 1)..3 {
                assert_abs_diff_eq!(m.col(i).dot(m.col(j)), 0.0, epsilon = eps);
            }
        }
    }

    #[test]
    fn test_diagonal_input_is_identity() {
        let cov = Mat3::diagonal(0.5, 2.0, 0.0);
        let eigen = Eigen3::new(&cov).unwrap();
        assert_eq!(eigen.basis, Mat3::IDENTITY);
        assert_eq!(eigen.eigenvalues, Vec3::new(0.5, 2.0, 0.0));
        assert_eq!(eigen.iterations, 0);
        assert!(eigen.converged);
    }

    #[test]
    fn test_diagonal_input_keeps_signs() {
        let eigen = Eigen3::new(&Mat3::diagonal(-2.0, 1.0, 0.5)).unwrap();
        assert_eq!(eigen.iterations, 0);
        assert_eq!(eigen.basis, Mat3::IDENTITY);
        assert_eq!(eigen.eigenvalues, Vec3::new(-2.0, 1.0, 0.5));

        // once rotated, eigenvalues are reported by magnitude
        let r = rotation(Vec3::new(1.0, 2.0, -0.5), 0.7);
        let eigen = Eigen3::new(&rotated_spread(&r, Vec3::new(-2.0, 1.0, 0.5))).unwrap();
        assert!(eigen.iterations > 0);
        let sorted = eigen.sorted_descending();
        assert_abs_diff_eq!(sorted.eigenvalues, Vec3::new(2.0, 1.0, 0.5), epsilon = 1e-4);
    }

    #[test]
    fn test_zero_matrix() {
        let eigen = Eigen3::new(&Mat3::ZERO).unwrap();
        assert_eq!(eigen.basis, Mat3::IDENTITY);
        assert_eq!(eigen.eigenvalues, Vec3::ZERO);
        assert_eq!(eigen.rank(1e-4), 0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut cov = Mat3::diagonal(1.0, 2.0, 3.0);
        cov.set(0, 1, f32::NAN);
        cov.set(1, 0, f32::NAN);
        let err = Eigen3::new(&cov).unwrap_err();
        assert!(err.is_non_finite());

        let cov = Mat3::diagonal(f32::INFINITY, 1.0, 1.0);
        assert!(Eigen3::new(&cov).is_err());
    }

    #[test]
    fn test_single_rotation_zeroes_pivot() {
        let cov = Mat3::from_rows([
            [3.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 2.0],
        ]);
        let rot = PlaneRotation::for_pivot(&cov).unwrap();
        assert_eq!((rot.p, rot.q), (0, 1));
        let (spread, basis) = rot.apply(&cov, &Mat3::IDENTITY);
        assert_abs_diff_eq!(spread.get(0, 1), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(spread.get(1, 0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(basis.determinant(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pivot_prefers_largest_then_yz() {
        let cov = Mat3::from_rows([
            [1.0, 0.5, -3.0],
            [0.5, 1.0, 0.2],
            [-3.0, 0.2, 1.0],
        ]);
        let rot = PlaneRotation::for_pivot(&cov).unwrap();
        assert_eq!((rot.p, rot.q), (0, 2));

        let tie = Mat3::from_rows([
            [2.0, 1.0, 1.0],
            [1.0, 2.0, 1.0],
            [1.0, 1.0, 2.0],
        ]);
        let rot = PlaneRotation::for_pivot(&tie).unwrap();
        assert_eq!((rot.p, rot.q), (1, 2));

        assert!(PlaneRotation::for_pivot(&Mat3::diagonal(1.0, 2.0, 3.0)).is_none());
    }

    #[test]
    fn test_every_step_keeps_symmetry_and_trace() {
        let r = rotation(Vec3::new(1.0, 2.0, 3.0), 0.7);
        let cov = rotated_spread(&r, Vec3::new(4.0, 1.0, 0.25));
        let trace = cov.trace();

        let mut spread = cov;
        let mut basis = Mat3::IDENTITY;
        let mut prev_off = spread.off_diagonal_norm_squared();
        for _ in 0..20 {
            let Some(rot) = PlaneRotation::for_pivot(&spread) else {
                break;
            };
            (spread, basis) = rot.apply(&spread, &basis);
            assert!(spread.is_symmetric(1e-5));
            assert_abs_diff_eq!(spread.trace(), trace, epsilon = 1e-4);
            let off = spread.off_diagonal_norm_squared();
            assert!(off <= prev_off + 1e-6);
            prev_off = off;
            if spread.is_diagonal(4e-5) {
                break;
            }
        }
        assert_orthonormal(&basis, 1e-4);
    }

    #[test]
    fn test_converges_on_rotated_spread() {
        let axes = [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.3, 1.0, 0.1),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(5.0, -1.0, 2.0),
        ];
        let expected = [4.0, 1.0, 0.25];
        for axis in axes {
            for k in 1..8 {
                let r = rotation(axis, k as f32 * 0.45);
                let cov = rotated_spread(&r, Vec3::new(1.0, 4.0, 0.25));
                let eigen = Eigen3::new(&cov).unwrap();

                assert!(eigen.converged);
                assert!(eigen.iterations < 500);
                assert_orthonormal(&eigen.basis, 1e-4);
                assert_abs_diff_eq!(eigen.reconstruct(), cov, epsilon = 5e-4);

                let sorted = eigen.sorted_descending();
                for (i, &e) in expected.iter().enumerate() {
                    assert_abs_diff_eq!(sorted.eigenvalues[i], e, epsilon = 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_eigenvectors_satisfy_definition() {
        let cov = Mat3::from_rows([
            [2.0, 0.3, -0.4],
            [0.3, 1.5, 0.25],
            [-0.4, 0.25, 0.8],
        ]);
        let eigen = Eigen3::new(&cov).unwrap();
        for i in 0..3 {
            let v = eigen.eigenvector(i);
            assert_abs_diff_eq!(cov * v, v * eigen.eigenvalues[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_iteration_cap_returns_best_effort() {
        let cov = Mat3::from_rows([
            [2.0, 1.0, 1.0],
            [1.0, 2.0, 1.0],
            [1.0, 1.0, 2.0],
        ]);
        let config = JacobiConfig {
            max_iterations: 1,
            ..JacobiConfig::default()
        };
        let eigen = diagonalize(&cov, &config).unwrap();
        assert!(!eigen.converged);
        assert_eq!(eigen.iterations, 1);
        assert_orthonormal(&eigen.basis, 1e-5);

        let eigen = Eigen3::new(&cov).unwrap().sorted_descending();
        assert!(eigen.converged);
        assert_abs_diff_eq!(eigen.eigenvalues, Vec3::new(4.0, 1.0, 1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_sorted_descending_keeps_handedness() {
        let eigen = Eigen3::new(&Mat3::diagonal(0.5, 2.0, 1.0)).unwrap();
        let sorted = eigen.sorted_descending();
        assert_eq!(sorted.eigenvalues, Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(sorted.eigenvector(0), Vec3::Y);
        assert_eq!(sorted.eigenvector(1), Vec3::Z);
        assert_eq!(sorted.eigenvector(2), Vec3::X);
        assert_abs_diff_eq!(sorted.basis.determinant(), 1.0, epsilon = 1e-6);

        // odd permutation flips the last column
        let eigen = Eigen3::new(&Mat3::diagonal(2.0, 3.0, 1.0)).unwrap();
        let sorted = eigen.sorted_descending();
        assert_eq!(sorted.eigenvalues, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(sorted.eigenvector(2), -Vec3::Z);
        assert_abs_diff_eq!(sorted.basis.determinant(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rank() {
        let eigen = Eigen3::new(&Mat3::diagonal(3.0, 1e-9, 0.0)).unwrap();
        assert_eq!(eigen.rank(1e-4), 1);
        let eigen = Eigen3::new(&Mat3::diagonal(3.0, 2.0, 0.0)).unwrap();
        assert_eq!(eigen.rank(1e-4), 2);
    }
}
