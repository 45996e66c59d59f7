//! Robust orthonormal frames from two directions.
//!
//! [`orthonormal_basis`] turns a primary and a secondary direction into a
//! right-handed orthonormal frame, whatever the inputs look like: null
//! vectors and parallel pairs are repaired with world axes instead of
//! producing NaNs or zero columns.
//!
//! # Construction
//!
//! ```text
//! U = primary, V = secondary
//! if U is null, V is null or V is parallel to U:  repair with world axes
//! U = |U|, W = V - U (V . U), N = |U x W|, V = N x U
//! ```
//!
//! Parallelism is judged on the rejection `W` relative to `|V|`, so the
//! test does not depend on the input scale. `N` is built from the unit `U`
//! and `W`, never from the raw `U x V`, whose f32 rounding noise can
//! dominate for nearly parallel inputs. Recomputing `V` from the two unit
//! vectors `N` and `U` keeps the frame exactly orthogonal.
//!
//! The frame is then laid out according to an [`AxisPlane`], which says on
//! which local axes `U` and `V` land.
//!
//! # Usage
//!
//! ```rust
//! use basis_math::{orthonormal_basis, AxisPlane, Vec3};
//!
//! // tangent along +X, surface spanning the XZ plane
//! let frame = orthonormal_basis(Vec3::X, Vec3::Z, AxisPlane::Xz);
//! assert_eq!(frame.col(0), Vec3::X);
//! assert_eq!(frame.col(2), Vec3::Z);
//! ```

use crate::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Smallest sine of the angle between two directions that still counts as
/// non-parallel.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Which local axes the primary and secondary directions map to.
///
/// The first letter is the local axis of the primary direction `U`, the
/// second that of the secondary `V`. The normal `N = U x V` fills the
/// remaining axis, negated for the mirrored layouts so every frame stays
/// right-handed:
///
/// | plane | x  | y  | z  |
/// |-------|----|----|----|
/// | `Xy`  | U  | V  | N  |
/// | `Yz`  | N  | U  | V  |
/// | `Zx`  | V  | N  | U  |
/// | `Yx`  | V  | U  | -N |
/// | `Zy`  | -N | V  | U  |
/// | `Xz`  | U  | -N | V  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisPlane {
    /// U on x, V on y.
    #[default]
    Xy,
    /// U on y, V on z.
    Yz,
    /// U on z, V on x.
    Zx,
    /// U on y, V on x.
    Yx,
    /// U on z, V on y.
    Zy,
    /// U on x, V on z.
    Xz,
    /// No preference: axes are assigned by their world orientation.
    ///
    /// The vector most aligned with world Z becomes local z, the one of the
    /// remaining two most aligned with world Y becomes local y.
    Undefined,
}

impl AxisPlane {
    /// All layouts, explicit ones first.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Xy,
            Self::Yz,
            Self::Zx,
            Self::Yx,
            Self::Zy,
            Self::Xz,
            Self::Undefined,
        ]
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Yz => "yz",
            Self::Zx => "zx",
            Self::Yx => "yx",
            Self::Zy => "zy",
            Self::Xz => "xz",
            Self::Undefined => "undefined",
        }
    }

    /// Lays out an orthonormal right-handed `(u, v, n)` triple as frame columns.
    fn arrange(self, u: Vec3, v: Vec3, n: Vec3) -> Mat3 {
        match self {
            Self::Xy => Mat3::from_col_vecs(u, v, n),
            Self::Yz => Mat3::from_col_vecs(n, u, v),
            Self::Zx => Mat3::from_col_vecs(v, n, u),
            Self::Yx => Mat3::from_col_vecs(v, u, -n),
            Self::Zy => Mat3::from_col_vecs(-n, v, u),
            Self::Xz => Mat3::from_col_vecs(u, -n, v),
            Self::Undefined => {
                let mut axes = [u, v, n];
                // most vertical-in-Z vector into the z slot
                let zi = (0..3)
                    .max_by(|&a, &b| axes[a].z.abs().total_cmp(&axes[b].z.abs()))
                    .unwrap_or(2);
                axes.swap(zi, 2);
                if axes[0].y.abs() > axes[1].y.abs() {
                    axes.swap(0, 1);
                }
                let (y, z) = (axes[1], axes[2]);
                Mat3::from_col_vecs(y.cross(z), y, z)
            }
        }
    }
}

impl fmt::Display for AxisPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisPlane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown axis plane '{s}', expected one of xy, yz, zx, yx, zy, xz, undefined"
                )
            })
    }
}

/// Builds a right-handed orthonormal frame from two directions.
///
/// Returns a matrix whose columns are the local x, y, z axes in world
/// space. Neither input needs to be normalized, and degenerate inputs are
/// repaired:
///
/// - a null `primary` is replaced by world X, and `secondary` is swung
///   perpendicular to it (world Y if that collapses);
/// - a null `secondary`, or one within [`PARALLEL_EPSILON`] of parallel to
///   `primary`, is replaced by `primary x Z` (world Y if `primary` itself
///   points along Z).
///
/// For finite inputs no column is ever zero.
///
/// # Example
///
/// ```rust
/// use basis_math::{orthonormal_basis, AxisPlane, Vec3};
///
/// // parallel inputs still give a valid frame
/// let frame = orthonormal_basis(Vec3::Y, Vec3::Y * 3.0, AxisPlane::Xy);
/// assert!((frame.determinant() - 1.0).abs() < 1e-6);
/// assert_eq!(frame.col(0), Vec3::Y);
/// ```
pub fn orthonormal_basis(primary: Vec3, secondary: Vec3, plane: AxisPlane) -> Mat3 {
    let mut u = primary;
    let mut v = secondary;

    if u.is_null() {
        trace!(?primary, ?secondary, "repairing null primary direction");
        u = Vec3::X;
        v = v.cross(u);
        if v.is_null() {
            v = Vec3::Y;
        }
    }
    let u = u.normalize();

    let mut w = reject(v, u);
    if v.is_null()
        || w.length_squared() <= PARALLEL_EPSILON * PARALLEL_EPSILON * v.length_squared()
    {
        trace!(?primary, ?secondary, "repairing null or parallel secondary direction");
        v = u.cross(Vec3::Z);
        if v.is_null() {
            v = Vec3::Y;
        }
        w = reject(v, u);
    }

    let n = u.cross(w).normalize();
    let v = n.cross(u);
    plane.arrange(u, v, n)
}

/// Component of `v` perpendicular to the unit vector `u`.
#[inline]
fn reject(v: Vec3, u: Vec3) -> Vec3 {
    v - u * v.dot(u)
}
