//! Covariance command.
//!
//! Prints the mean and covariance matrix of the sampled points of each file.

use crate::CovarianceArgs;
use anyhow::Result;
use basis_math::{covariance_with_mean, Mat3, Vec3};
use serde::Serialize;
use tracing::trace;

#[derive(Serialize)]
struct CovarianceReport {
    samples: usize,
    mean: Vec3,
    covariance: Mat3,
}

pub fn run(args: CovarianceArgs, verbose: u8) -> Result<()> {
    trace!(files = args.input.len(), sampling = ?args.sampling, "covariance::run");

    super::run_files(
        &args.input,
        args.json,
        |points| {
            let walk = args.sampling.walk(points.len());
            let (covariance, mean) = covariance_with_mean(points, walk)?;
            Ok(CovarianceReport {
                samples: walk.count,
                mean,
                covariance,
            })
        },
        |report| {
            if verbose > 0 {
                println!("  Samples:    {}", report.samples);
            }
            super::print_vec("Mean", report.mean);
            super::print_matrix("Covariance", &report.covariance);
        },
    )
}
