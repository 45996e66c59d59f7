//! Sample covariance of a point set.
//!
//! The covariance matrix describes how a point cloud spreads around its
//! mean: the diagonal holds the per-axis variance, the off-diagonal entries
//! the shared `xy`, `xz`, `yz` terms. Feeding it to
//! [`diagonalize`](crate::diagonalize) yields the principal axes.
//!
//! Large meshes can be sampled sparsely with a [`SampleWalk`] (every k-th
//! vertex starting at an offset) for cheap approximate statistics.
//!
//! # Usage
//!
//! ```rust
//! use basis_math::{covariance, Mat3, SampleWalk, Vec3};
//!
//! let points = [
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(-1.0, 0.0, 0.0),
//!     Vec3::new(0.0, 2.0, 0.0),
//!     Vec3::new(0.0, -2.0, 0.0),
//! ];
//! let cov = covariance(&points, SampleWalk::full(points.len())).unwrap();
//! assert_eq!(cov, Mat3::diagonal(0.5, 2.0, 0.0));
//! ```
//!
//! # Normalization
//!
//! Accumulators are scaled by `1 / count` (population variance, no Bessel
//! correction).

use crate::{Mat3, Vec3};
use basis_core::{Error, Result, SampleWalk};
use tracing::{debug, trace};

/// Computes the covariance matrix of the sampled subset of `points`.
///
/// # Errors
///
/// - [`Error::NoPoints`] if `points` is empty
/// - [`Error::InvalidSampleCount`] if `walk.count` is 0 or exceeds `points.len()`
/// - [`Error::InvalidStride`] if `walk.stride` is 0 or its magnitude exceeds
///   [`SampleWalk::max_stride`]
/// - [`Error::InsufficientSamples`] if the walk visits fewer than 2 distinct points
#[inline]
pub fn covariance(points: &[Vec3], walk: SampleWalk) -> Result<Mat3> {
    covariance_with_mean(points, walk).map(|(cov, _)| cov)
}

/// Like [`covariance`], also returning the mean of the sampled points.
pub fn covariance_with_mean(points: &[Vec3], walk: SampleWalk) -> Result<(Mat3, Vec3)> {
    validate(points.len(), &walk)?;
    let len = points.len();
    let samples = || (0..walk.count).map(|i| points[walk.index(i, len)]);

    let scale = 1.0 / walk.count as f32;
    let mut mean = Vec3::ZERO;
    for p in samples() {
        mean += p;
    }
    mean = mean * scale;

    // squared deviations and pairwise products
    let mut sq = Vec3::ZERO;
    let (mut xy, mut xz, mut yz) = (0.0f32, 0.0f32, 0.0f32);
    for p in samples() {
        let d = p - mean;
        sq += Vec3::new(d.x * d.x, d.y * d.y, d.z * d.z);
        xy += d.x * d.y;
        xz += d.x * d.z;
        yz += d.y * d.z;
    }
    sq = sq * scale;
    let (xy, xz, yz) = (xy * scale, xz * scale, yz * scale);

    trace!(count = walk.count, stride = walk.stride, offset = walk.offset, "covariance");

    let cov = Mat3::from_rows([
        [sq.x, xy, xz],
        [xy, sq.y, yz],
        [xz, yz, sq.z],
    ]);
    Ok((cov, mean))
}

fn validate(len: usize, walk: &SampleWalk) -> Result<()> {
    if len == 0 {
        return Err(Error::NoPoints);
    }
    if walk.count == 0 || walk.count > len {
        return Err(Error::invalid_sample_count(walk.count, len));
    }
    let max = SampleWalk::max_stride(len);
    if walk.stride == 0 || walk.stride.unsigned_abs() > max {
        return Err(Error::invalid_stride(walk.stride, max));
    }
    let distinct = walk.distinct(len);
    if distinct < 2 {
        debug!(distinct, len, "sampling walk too narrow for a covariance");
        return Err(Error::insufficient_samples(distinct));
    }
    Ok(())
}
