use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use overlap_fit::{fit_points, write_fit_json, FitOpts};
use overlap_mc::read_points_csv;

#[derive(Args, Debug)]
pub struct FitArgs {
    /// Point series written by `overlap-sim sweep`.
    #[arg(long)]
    pub points: PathBuf,
    /// Output directory for `fit_report.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Polynomial degree.
    #[arg(long, default_value_t = 4)]
    pub degree: usize,
    /// Largest accepted condition number of the scaled design matrix.
    #[arg(long)]
    pub max_condition: Option<f64>,
}

pub fn run(args: &FitArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let points = read_points_csv(&args.points)?;
    let mut opts = FitOpts::with_degree(args.degree);
    if let Some(limit) = args.max_condition {
        opts.max_condition = limit;
    }
    let fit = fit_points(&points, &opts)?;
    tracing::info!(
        points = fit.point_count,
        condition_number = fit.condition_number,
        "fit complete"
    );
    write_fit_json(&args.out.join("fit_report.json"), &fit)?;
    println!("{}", fit.model);
    Ok(())
}
