//! PCA command: covariance followed by Jacobi diagonalization.

use crate::PcaArgs;
use anyhow::Result;
use basis_math::{covariance, diagonalize, AnalysisConfig, Mat3, Vec3};
use serde::Serialize;
use tracing::trace;

#[derive(Serialize)]
struct PcaReport {
    samples: usize,
    covariance: Mat3,
    /// Eigenvectors as columns.
    eigenvectors: Mat3,
    eigenvalues: Vec3,
    rank: usize,
    iterations: usize,
    converged: bool,
}

/// Runs the pca command.
///
/// Eigenvectors come out in solver order unless `--sort` is given.
pub fn run(args: PcaArgs, config: AnalysisConfig, verbose: u8) -> Result<()> {
    let config = args.solver.apply(config);
    trace!(files = args.input.len(), ?config, sort = args.sort, "pca::run");

    super::run_files(
        &args.input,
        args.json,
        |points| {
            let walk = args.sampling.walk(points.len());
            let cov = covariance(points, walk)?;
            let mut eigen = diagonalize(&cov, &config.jacobi)?;
            if args.sort {
                eigen = eigen.sorted_descending();
            }
            Ok(PcaReport {
                samples: walk.count,
                covariance: cov,
                eigenvectors: eigen.basis,
                eigenvalues: eigen.eigenvalues,
                rank: eigen.rank(config.rank_epsilon),
                iterations: eigen.iterations,
                converged: eigen.converged,
            })
        },
        |report| {
            if verbose > 0 {
                println!("  Samples:    {}", report.samples);
                super::print_matrix("Covariance", &report.covariance);
            }
            super::print_vec("Eigenvalues", report.eigenvalues);
            super::print_matrix("Eigenvectors (columns)", &report.eigenvectors);
            println!("  Rank:       {}", report.rank);
            if report.converged {
                println!("  Converged:  {} rotations", report.iterations);
            } else {
                println!("  Converged:  no (stopped after {} rotations)", report.iterations);
            }
        },
    )
}
