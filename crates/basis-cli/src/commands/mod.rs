//! CLI command implementations

pub mod basis;
pub mod covariance;
pub mod frame;
pub mod pca;

use anyhow::{bail, Context, Result};
use basis_math::{AnalysisConfig, Mat3, Vec3};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load points from path
pub fn load_points(path: &Path) -> Result<Vec<Vec3>> {
    basis_math::read_points(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Load analysis settings; defaults when no file is given.
///
/// Missing fields in the file keep their default values.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[derive(Serialize)]
struct FileReport<'a, T> {
    file: String,
    #[serde(flatten)]
    report: &'a T,
}

/// Analyzes every file in parallel, then prints the reports in input order.
///
/// Failing files are reported on stderr and do not stop the others; the
/// command fails afterwards if any file did.
pub fn run_files<T, F, P>(files: &[PathBuf], json: bool, analyze: F, print: P) -> Result<()>
where
    T: Serialize + Send,
    F: Fn(&[Vec3]) -> basis_math::Result<T> + Sync,
    P: Fn(&T),
{
    info!(files = files.len(), "analyzing point files");

    let results: Vec<Result<T>> = files
        .par_iter()
        .map(|path| {
            let points = load_points(path)?;
            analyze(&points).with_context(|| format!("Failed to analyze: {}", path.display()))
        })
        .collect();

    let mut reports = Vec::new();
    let mut failed = 0;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(report) => reports.push((path, report)),
            Err(e) => {
                failed += 1;
                eprintln!("Error: {:#}", e);
            }
        }
    }

    if json {
        let out: Vec<_> = reports
            .iter()
            .map(|(path, report)| FileReport {
                file: path.display().to_string(),
                report,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (i, (path, report)) in reports.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", path.display());
            print(report);
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

/// Print a labelled vector on one line
pub fn print_vec(label: &str, v: Vec3) {
    println!("  {:<12}{:>12.6} {:>12.6} {:>12.6}", format!("{}:", label), v.x, v.y, v.z);
}

/// Print a labelled matrix, one row per line
pub fn print_matrix(label: &str, m: &Mat3) {
    println!("  {}:", label);
    for r in 0..3 {
        let row = m.row(r);
        println!("    [{:>12.6} {:>12.6} {:>12.6}]", row.x, row.y, row.z);
    }
}
