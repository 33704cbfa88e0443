//! Splitting cost matrix (lapsplit-cost) - Main entry point
//!
//! Reads a JSON splitting problem, builds the splitting cost matrix and writes
//! it as JSON (numeric form, blocked pairs carrying the blocking value).
//!
//! **Usage:**
//! ```bash
//! lapsplit-cost --input problem.json [--config config.toml] [--output matrix.json] [--single-threaded]
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lapsplit_common::TomlConfig;
use lapsplit_cost::problem::SplitProblem;
use lapsplit_cost::SplittingCostFunction;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for lapsplit-cost
#[derive(Parser, Debug)]
#[command(name = "lapsplit-cost")]
#[command(about = "Build the LAP tracker splitting cost matrix")]
#[command(version)]
struct Args {
    /// Splitting problem (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration file (TOML); falls back to LAPSPLIT_CONFIG, then the platform config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the matrix (JSON); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compute on a single worker thread
    #[arg(long)]
    single_threaded: bool,

    /// Number of worker threads (ignored with --single-threaded)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    config_source.log();

    if args.single_threaded {
        config.splitting.use_multithreading = false;
    } else if let Some(threads) = args.threads {
        config.splitting.worker_threads = Some(threads);
    }

    let problem = SplitProblem::load(&args.input)
        .with_context(|| format!("Failed to read problem {}", args.input.display()))?;
    let resolved = problem.resolve().context("Invalid splitting problem")?;
    info!(
        "Loaded {} track segment(s) and {} middle spot(s) from {}",
        resolved.track_segments.len(),
        resolved.middle_spots.len(),
        args.input.display()
    );

    let cost_function = SplittingCostFunction::new(config.splitting)
        .context("Invalid splitting settings")?;

    let started = Instant::now();
    let matrix = cost_function
        .build(&resolved.track_segments, &resolved.middle_spots)
        .context("Failed to build splitting cost matrix")?;
    info!(
        "Built {}x{} matrix on {} worker(s) in {:?} ({} blocked)",
        matrix.rows(),
        matrix.cols(),
        cost_function.pool().size(),
        started.elapsed(),
        matrix.blocked_count()
    );

    let dense = matrix.to_dense_matrix();
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dense)?;
            writer.flush()?;
            info!("Matrix written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dense)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
