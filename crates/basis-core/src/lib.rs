//! # basis-core
//!
//! Core types shared by the basis extraction crates.
//!
//! This crate provides the foundation the numeric crates build on:
//!
//! - [`Error`], [`Result`] - Typed failures for degenerate input
//! - [`SampleWalk`] - Deterministic sub-sampling of point arrays
//! - [`JacobiConfig`], [`AnalysisConfig`] - Solver and analysis settings
//!
//! ## Crate Structure
//!
//! ```text
//! basis-core (this crate)
//!    ^
//!    |
//!    +-- basis-math (vectors, matrices, covariance, eigen, frames)
//!    +-- basis-cli (command line front end)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::*;
pub use error::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use basis_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AnalysisConfig, JacobiConfig, SampleWalk};
    pub use crate::error::{Error, Result};
}
