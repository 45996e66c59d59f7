//! Principal frame of a point set.
//!
//! Chains the three stages of basis extraction:
//!
//! ```text
//! points -> covariance -> diagonalize -> orthonormal_basis
//! ```
//!
//! The resulting [`PrincipalFrame`] is centered on the sample mean with its
//! x axis along the direction of largest spread and its y axis along the
//! second largest. Rank-deficient point sets (collinear, coplanar or
//! coincident points) still produce a full frame: the axes without spread
//! are chosen by the degeneracy repair of [`orthonormal_basis`].
//!
//! # Usage
//!
//! ```rust
//! use basis_core::{AnalysisConfig, SampleWalk};
//! use basis_math::{PrincipalFrame, Vec3};
//!
//! let points: Vec<Vec3> = (0..10)
//!     .map(|i| Vec3::new(i as f32, 0.5 * (i % 2) as f32, 1.0))
//!     .collect();
//! let frame =
//!     PrincipalFrame::from_points(&points, SampleWalk::full(10), &AnalysisConfig::default())
//!         .unwrap();
//! // long axis of the cloud is (close to) world X
//! assert!(frame.axes.col(0).x.abs() > 0.99);
//! ```

use crate::{covariance_with_mean, diagonalize, orthonormal_basis, AxisPlane, Eigen3, Mat3, Vec3};
use basis_core::{AnalysisConfig, Result, SampleWalk};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Centroid and principal axes of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalFrame {
    /// Mean of the sampled points.
    pub centroid: Vec3,
    /// Covariance of the sampled points.
    pub covariance: Mat3,
    /// Eigen decomposition, sorted by decreasing eigenvalue.
    pub eigen: Eigen3,
    /// Right-handed orthonormal axes as columns (x = largest spread).
    pub axes: Mat3,
    /// Number of eigenvalues above the rank threshold.
    pub rank: usize,
}

impl PrincipalFrame {
    /// Computes the principal frame of the sampled subset of `points`.
    ///
    /// # Errors
    ///
    /// Sampling errors from [`covariance`](crate::covariance) and
    /// non-finite errors from [`diagonalize`].
    pub fn from_points(
        points: &[Vec3],
        walk: SampleWalk,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let (covariance, centroid) = covariance_with_mean(points, walk)?;
        Self::from_covariance(covariance, centroid, config)
    }

    /// Builds the frame from a precomputed covariance and centroid.
    pub fn from_covariance(
        covariance: Mat3,
        centroid: Vec3,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let eigen = diagonalize(&covariance, &config.jacobi)?.sorted_descending();
        let rank = eigen.rank(config.rank_epsilon);

        // axes without spread are left to the degeneracy repair
        let primary = if rank >= 1 { eigen.eigenvector(0) } else { Vec3::ZERO };
        let secondary = if rank >= 2 { eigen.eigenvector(1) } else { Vec3::ZERO };
        let axes = orthonormal_basis(primary, secondary, AxisPlane::Xy);

        debug!(rank, eigenvalues = ?eigen.eigenvalues, "principal frame");

        Ok(Self {
            centroid,
            covariance,
            eigen,
            axes,
            rank,
        })
    }

    /// Expresses a world point in frame coordinates.
    #[inline]
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        self.axes.transpose() * (p - self.centroid)
    }

    /// Maps frame coordinates back to world space.
    #[inline]
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        self.axes * p + self.centroid
    }

    /// Standard deviation along each frame axis.
    pub fn extents(&self) -> Vec3 {
        let e = self.eigen.eigenvalues;
        Vec3::new(e.x.sqrt(), e.y.sqrt(), e.z.sqrt())
    }
}
