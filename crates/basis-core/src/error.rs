//! Error types for basis extraction.
//!
//! Every fallible operation in the workspace reports through the [`Error`]
//! enum instead of returning a zero matrix. A zero matrix coming back from
//! `covariance` therefore always means "the samples coincide", never "the
//! request was unusable".
//!
//! # Usage
//!
//! ```rust
//! use basis_core::{Error, Result};
//!
//! fn check_count(count: usize, len: usize) -> Result<()> {
//!     if count == 0 || count > len {
//!         return Err(Error::invalid_sample_count(count, len));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_count(0, 4).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - `basis-math` - Covariance and eigen decomposition
//! - `basis-cli` - Point file parsing

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting statistics or bases.
///
/// # Categories
///
/// - **Sampling errors**: [`NoPoints`](Error::NoPoints),
///   [`InvalidSampleCount`](Error::InvalidSampleCount),
///   [`InvalidStride`](Error::InvalidStride),
///   [`InsufficientSamples`](Error::InsufficientSamples)
/// - **Numeric errors**: [`NonFinite`](Error::NonFinite)
/// - **Input errors**: [`Parse`](Error::Parse), [`Io`](Error::Io)
#[derive(Debug, Error)]
pub enum Error {
    /// The point set is empty.
    #[error("point set is empty")]
    NoPoints,

    /// Requested sample count is zero or larger than the point set.
    #[error("sample count {count} is outside 1..={len}")]
    InvalidSampleCount {
        /// Requested number of samples
        count: usize,
        /// Number of points available
        len: usize,
    },

    /// Stride is zero or too large for the point set.
    ///
    /// The stride magnitude may not exceed `max(1, len / 4)`.
    #[error("stride {stride} is invalid, magnitude must be in 1..={max}")]
    InvalidStride {
        /// Requested stride
        stride: isize,
        /// Largest accepted stride magnitude
        max: usize,
    },

    /// The sampling walk visits fewer than two distinct points.
    ///
    /// Happens when the walk wraps around onto itself (stride shares a large
    /// factor with the point count) or when only one sample was requested.
    #[error("sampling walk visits {distinct} distinct point(s), need at least 2")]
    InsufficientSamples {
        /// Number of distinct points the walk visits
        distinct: usize,
    },

    /// The input matrix contains NaN or infinite values.
    #[error("{what} contains non-finite values")]
    NonFinite {
        /// Name of the offending input
        what: &'static str,
    },

    /// Text input could not be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// I/O error while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::InvalidSampleCount`] error.
    #[inline]
    pub fn invalid_sample_count(count: usize, len: usize) -> Self {
        Self::InvalidSampleCount { count, len }
    }

    /// Creates an [`Error::InvalidStride`] error.
    #[inline]
    pub fn invalid_stride(stride: isize, max: usize) -> Self {
        Self::InvalidStride { stride, max }
    }

    /// Creates an [`Error::InsufficientSamples`] error.
    #[inline]
    pub fn insufficient_samples(distinct: usize) -> Self {
        Self::InsufficientSamples { distinct }
    }

    /// Creates an [`Error::NonFinite`] error.
    #[inline]
    pub fn non_finite(what: &'static str) -> Self {
        Self::NonFinite { what }
    }

    /// Creates an [`Error::Parse`] error.
    #[inline]
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error describes an unusable sampling request.
    ///
    /// None of these yield a covariance; the point set has no usable spread
    /// under the requested walk.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::NoPoints
                | Self::InvalidSampleCount { .. }
                | Self::InvalidStride { .. }
                | Self::InsufficientSamples { .. }
        )
    }

    /// Returns `true` if this is a non-finite input error.
    #[inline]
    pub fn is_non_finite(&self) -> bool {
        matches!(self, Self::NonFinite { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[inline]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
