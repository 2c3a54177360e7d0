use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    coil_axis::{self, CoilAxisArgs},
    layout::{self, LayoutArgs},
    optimize::{self, OptimizeArgs},
    probe::{self, ProbeArgs},
    sweep::{self, SweepArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "hemi-sim", about = "Hemisphere electromagnet design explorer")]
struct Cli {
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep the design space and rank every configuration.
    Sweep(SweepArgs),
    /// Search current, turns and diameter of a single flat coil for pull force.
    Optimize(OptimizeArgs),
    /// Export the placed sources and sensors of one design as JSON.
    Layout(LayoutArgs),
    /// Evaluate the field of one design at every sensor.
    Probe(ProbeArgs),
    /// On-axis field of a flat spiral coil.
    CoilAxis(CoilAxisArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);
    match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Optimize(args) => optimize::run(&args),
        Command::Layout(args) => layout::run(&args),
        Command::Probe(args) => probe::run(&args),
        Command::CoilAxis(args) => coil_axis::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
