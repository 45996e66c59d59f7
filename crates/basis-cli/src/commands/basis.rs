//! Frame from two directions.

use crate::BasisArgs;
use anyhow::Result;
use basis_math::{orthonormal_basis, AxisPlane, Mat3};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct BasisReport {
    plane: AxisPlane,
    frame: Mat3,
    determinant: f32,
}

pub fn run(args: BasisArgs) -> Result<()> {
    let frame = orthonormal_basis(args.primary, args.secondary, args.plane);
    debug!(primary = ?args.primary, secondary = ?args.secondary, plane = %args.plane, "basis::run");

    let report = BasisReport {
        plane: args.plane,
        frame,
        determinant: frame.determinant(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Plane: {}", report.plane);
        super::print_matrix("Frame (columns)", &report.frame);
        println!("  Determinant: {:.6}", report.determinant);
    }
    Ok(())
}
