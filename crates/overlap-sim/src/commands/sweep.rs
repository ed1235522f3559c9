use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use overlap_core::OverlapError;
use overlap_fit::{fit_points, write_fit_json, FitOpts};
use overlap_mc::{load_config, run_sweep, write_points_csv, write_report_json, SweepConfig};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep configuration; built-in defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for the report, points and fit.
    #[arg(long)]
    pub out: PathBuf,
    /// Overrides the configured master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Overrides the configured worker thread count.
    #[arg(long)]
    pub threads: Option<usize>,
    /// Overrides the configured polynomial degree.
    #[arg(long)]
    pub degree: Option<usize>,
}

fn resolve_config(args: &SweepArgs) -> Result<SweepConfig, OverlapError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SweepConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed_policy.master_seed = seed;
    }
    if let Some(threads) = args.threads {
        config.parallelism = threads;
    }
    if let Some(degree) = args.degree {
        config.polynomial_degree = degree;
    }
    config.validate()?;
    config.validate_fit_plan()?;
    Ok(config)
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = resolve_config(args)?;
    let report = run_sweep(&config)?;
    write_report_json(&args.out.join("sweep_report.json"), &report)?;
    write_points_csv(&args.out.join("points.csv"), &report.points)?;

    // An ill-conditioned fit still leaves the point series on disk.
    match fit_points(&report.points, &FitOpts::with_degree(config.polynomial_degree)) {
        Ok(fit) => {
            write_fit_json(&args.out.join("fit_report.json"), &fit)?;
            println!("{}", fit.model);
        }
        Err(err) => {
            tracing::warn!(error = %err, "curve fit skipped");
        }
    }
    Ok(())
}
