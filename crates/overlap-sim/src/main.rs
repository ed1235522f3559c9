use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    evaluate::{self, EvaluateArgs},
    fit::{self, FitArgs},
    sweep::{self, SweepArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "overlap-sim",
    about = "Monte Carlo estimate of shared-bin probability with a polynomial fit"
)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a probability sweep, export the points and fit the curve.
    Sweep(SweepArgs),
    /// Fit a polynomial to a saved point series.
    Fit(FitArgs),
    /// Evaluate a saved polynomial fit at one or more densities.
    Evaluate(EvaluateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Fit(args) => fit::run(&args),
        Command::Evaluate(args) => evaluate::run(&args),
    }
}
