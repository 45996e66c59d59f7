//! Principal frame command.

use crate::FrameArgs;
use anyhow::Result;
use basis_math::{AnalysisConfig, PrincipalFrame};
use tracing::trace;

pub fn run(args: FrameArgs, config: AnalysisConfig, verbose: u8) -> Result<()> {
    let config = args.solver.apply(config);
    trace!(files = args.input.len(), ?config, "frame::run");

    super::run_files(
        &args.input,
        args.json,
        |points| PrincipalFrame::from_points(points, args.sampling.walk(points.len()), &config),
        |frame| {
            super::print_vec("Centroid", frame.centroid);
            super::print_matrix("Axes (columns)", &frame.axes);
            super::print_vec("Extents", frame.extents());
            println!("  Rank:       {}", frame.rank);
            if verbose > 0 {
                super::print_vec("Eigenvalues", frame.eigen.eigenvalues);
                super::print_matrix("Covariance", &frame.covariance);
            }
        },
    )
}
