use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use overlap_fit::read_fit_json;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Fit report written by `overlap-sim sweep` or `overlap-sim fit`.
    #[arg(long)]
    pub fit: PathBuf,
    /// Densities to evaluate.
    #[arg(long = "x", required = true, num_args = 1..)]
    pub xs: Vec<f64>,
}

pub fn run(args: &EvaluateArgs) -> Result<(), Box<dyn Error>> {
    let fit = read_fit_json(&args.fit)?;
    let (lo, hi) = fit.domain;
    for x in &args.xs {
        if *x < lo || *x > hi {
            tracing::warn!(x, lo, hi, "extrapolating outside the fitted domain");
        }
        println!("{x}\t{}", fit.evaluate(*x));
    }
    Ok(())
}
