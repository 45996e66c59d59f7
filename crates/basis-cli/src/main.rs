//! basis - principal axes and orthonormal frames for point sets
//!
//! Reads plain-text point files and reports covariance, eigen decomposition
//! or a full principal frame; also builds frames from two directions.

use anyhow::{Context, Result};
use basis_math::{AnalysisConfig, AxisPlane, SampleWalk, Vec3};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "basis")]
#[command(author, version, about = "Principal axes and orthonormal frames for 3D point sets")]
#[command(long_about = "
Computes covariance matrices, Jacobi eigen decompositions and right-handed
orthonormal frames for point sets stored as plain text (one 'x y z' per line).

Examples:
  basis covariance scan.xyz                  # Covariance of every point
  basis covariance scan.xyz -n 500 -s 7      # 500 samples, every 7th point
  basis pca scan.xyz --sort                  # Eigen decomposition, largest first
  basis frame a.xyz b.xyz --json             # Principal frames as JSON
  basis basis -p 1,0,0 -s 0,0,1 --plane xz   # Frame from two directions
  basis --config solver.json pca scan.xyz    # Solver settings from file
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Analysis settings (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Covariance matrix and mean of sampled points
    #[command(visible_alias = "cov")]
    Covariance(CovarianceArgs),

    /// Covariance followed by eigen decomposition
    Pca(PcaArgs),

    /// Principal frame: centroid, axes, extents
    #[command(visible_alias = "f")]
    Frame(FrameArgs),

    /// Orthonormal frame from a primary and a secondary direction
    #[command(visible_alias = "b")]
    Basis(BasisArgs),
}

/// Which points of a file are sampled.
#[derive(Args, Debug, Clone)]
struct SamplingArgs {
    /// Number of samples (default: every point)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Step between samples; negative walks backwards
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    stride: isize,

    /// Index of the first sample
    #[arg(short, long, default_value = "0")]
    offset: usize,
}

impl SamplingArgs {
    fn walk(&self, len: usize) -> SampleWalk {
        SampleWalk::new(self.count.unwrap_or(len), self.stride, self.offset)
    }
}

/// Overrides for the Jacobi solver settings.
#[derive(Args, Debug, Clone)]
struct SolverArgs {
    /// Off-diagonal tolerance, relative to the largest element
    #[arg(long)]
    tolerance: Option<f32>,

    /// Rotation limit
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Relative eigenvalue threshold for rank detection
    #[arg(long)]
    rank_epsilon: Option<f32>,
}

impl SolverArgs {
    fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(tolerance) = self.tolerance {
            config.jacobi.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.jacobi.max_iterations = max_iterations;
        }
        if let Some(rank_epsilon) = self.rank_epsilon {
            config.rank_epsilon = rank_epsilon;
        }
        config
    }
}

#[derive(Args)]
struct CovarianceArgs {
    /// Point file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    #[command(flatten)]
    sampling: SamplingArgs,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PcaArgs {
    /// Point file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    #[command(flatten)]
    sampling: SamplingArgs,

    #[command(flatten)]
    solver: SolverArgs,

    /// Order eigenvectors by decreasing eigenvalue
    #[arg(long)]
    sort: bool,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FrameArgs {
    /// Point file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    #[command(flatten)]
    sampling: SamplingArgs,

    #[command(flatten)]
    solver: SolverArgs,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BasisArgs {
    /// Primary direction as x,y,z
    #[arg(short, long, value_parser = basis_math::parse_point, allow_hyphen_values = true)]
    primary: Vec3,

    /// Secondary direction as x,y,z
    #[arg(short, long, value_parser = basis_math::parse_point, allow_hyphen_values = true)]
    secondary: Vec3,

    /// Axis layout: xy, yz, zx, yx, zy, xz, undefined
    #[arg(long, default_value = "xy")]
    plane: AxisPlane,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Covariance(args) => commands::covariance::run(args, cli.verbose),
        Commands::Pca(args) => commands::pca::run(args, config, cli.verbose),
        Commands::Frame(args) => commands::frame::run(args, config, cli.verbose),
        Commands::Basis(args) => commands::basis::run(args),
    }
}
