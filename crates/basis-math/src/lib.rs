//! # basis-math
//!
//! Principal axes and robust frames for 3D point sets.
//!
//! This crate provides the numeric pipeline of basis extraction:
//!
//! - [`Vec3`] / [`Mat3`] - small f32 vector and matrix types
//! - [`covariance`] - sample covariance, optionally over a sparse [`SampleWalk`]
//! - [`diagonalize`] - Jacobi eigen decomposition of symmetric matrices
//! - [`orthonormal_basis`] - right-handed frames from two directions
//! - [`PrincipalFrame`] - the three stages chained together
//! - [`read_points`] / [`write_points`] - plain-text point files
//!
//! # Design
//!
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Frames and eigenvector bases store their axes as **columns**.
//!
//! # Usage
//!
//! ```rust
//! use basis_math::{
//!     covariance, diagonalize, orthonormal_basis, AxisPlane, JacobiConfig, SampleWalk, Vec3,
//! };
//!
//! let points = [
//!     Vec3::new(2.0, 0.1, 0.0),
//!     Vec3::new(-2.0, -0.1, 0.0),
//!     Vec3::new(0.0, 1.0, 0.2),
//!     Vec3::new(0.0, -1.0, -0.2),
//! ];
//! let cov = covariance(&points, SampleWalk::full(points.len())).unwrap();
//! let eigen = diagonalize(&cov, &JacobiConfig::default()).unwrap().sorted_descending();
//! let frame = orthonormal_basis(eigen.eigenvector(0), eigen.eigenvector(1), AxisPlane::Xy);
//! assert!((frame.determinant() - 1.0).abs() < 1e-4);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - conversions for callers already on glam
//! - `basis-core` - errors and configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod covariance;
mod eigen;
mod frame;
mod mat3;
mod pca;
mod points;
mod vec3;

pub use covariance::*;
pub use eigen::*;
pub use frame::*;
pub use mat3::*;
pub use pca::*;
pub use points::*;
pub use vec3::*;

pub use basis_core::{AnalysisConfig, Error, JacobiConfig, Result, SampleWalk};

/// Re-export of glam for interop.
pub use glam;
