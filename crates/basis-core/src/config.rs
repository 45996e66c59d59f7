//! Tunable parameters for sampling and diagonalization.
//!
//! All settings implement [`Default`] and serde's traits so they can be
//! loaded from a JSON settings file. Missing fields fall back to defaults.
//!
//! # Usage
//!
//! ```rust
//! use basis_core::{AnalysisConfig, SampleWalk};
//!
//! let config = AnalysisConfig::default();
//! assert_eq!(config.jacobi.max_iterations, 500);
//!
//! // Every 4th point of a 1000 point mesh, starting at index 2
//! let walk = SampleWalk::new(250, 4, 2);
//! assert_eq!(walk.index(1, 1000), 6);
//! ```

use serde::{Deserialize, Serialize};

/// Default relative tolerance for the near-diagonal test.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Default iteration cap for the Jacobi solver.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Default relative threshold under which an eigenvalue counts as zero.
pub const DEFAULT_RANK_EPSILON: f32 = 1e-4;

/// Deterministic sub-sampling walk over a point array.
///
/// Sample `i` reads `points[(offset + i * stride) mod len]`, using
/// Euclidean modulo so negative strides walk backwards and wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWalk {
    /// Number of samples to take.
    pub count: usize,
    /// Step between consecutive samples. Must be nonzero.
    pub stride: isize,
    /// Index of the first sample.
    pub offset: usize,
}

impl SampleWalk {
    /// Creates a new walk.
    #[inline]
    pub const fn new(count: usize, stride: isize, offset: usize) -> Self {
        Self {
            count,
            stride,
            offset,
        }
    }

    /// Walk visiting each of `len` points exactly once, in order.
    #[inline]
    pub const fn full(len: usize) -> Self {
        Self::new(len, 1, 0)
    }

    /// Largest accepted stride magnitude for a point set of `len` points.
    #[inline]
    pub fn max_stride(len: usize) -> usize {
        (len / 4).max(1)
    }

    /// Array index of sample `i` in a point set of `len` points.
    ///
    /// `len` must be nonzero.
    #[inline]
    pub fn index(&self, i: usize, len: usize) -> usize {
        let len = len as i128;
        let pos = self.offset as i128 + i as i128 * self.stride as i128;
        pos.rem_euclid(len) as usize
    }

    /// Number of distinct indices the walk visits in a set of `len` points.
    ///
    /// A walk of step `s` over `n` slots cycles after `n / gcd(n, s)` steps.
    pub fn distinct(&self, len: usize) -> usize {
        if len == 0 || self.stride == 0 {
            return self.count.min(len.min(1));
        }
        let cycle = len / gcd(len, self.stride.unsigned_abs());
        self.count.min(cycle)
    }
}

impl Default for SampleWalk {
    /// Single-stride walk with no samples; use [`SampleWalk::full`] instead.
    fn default() -> Self {
        Self::new(0, 1, 0)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Settings for the Jacobi eigenvalue iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JacobiConfig {
    /// Off-diagonal tolerance, relative to the largest input element.
    pub tolerance: f32,
    /// Rotation cap before giving up on full convergence.
    pub max_iterations: usize,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Settings for a complete point-set analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Eigen solver settings.
    pub jacobi: JacobiConfig,
    /// Eigenvalues below `rank_epsilon * largest` are treated as zero.
    pub rank_epsilon: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            jacobi: JacobiConfig::default(),
            rank_epsilon: DEFAULT_RANK_EPSILON,
        }
    }
}
