use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use hemi_exp::persist::{persist_report, GridCsvWriter};
use hemi_exp::{run_sweep, run_sweep_observed, SweepPlan};
use hemi_field::AnalyticOracle;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep plan; the built-in design space is swept when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Output directory for results, report and comparison table.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker threads, overriding the plan's scheduler.
    #[arg(long)]
    pub parallelism: Option<usize>,
    /// Also write top and side slice tables of every configuration.
    #[arg(long)]
    pub grids: bool,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let mut plan = match &args.plan {
        Some(path) => SweepPlan::from_yaml(&fs::read(path)?)?,
        None => SweepPlan::default(),
    };
    if let Some(parallelism) = args.parallelism {
        plan.scheduler.parallelism = parallelism;
    }
    fs::create_dir_all(&args.out)?;

    let oracle = AnalyticOracle::new();
    let report = if args.grids {
        run_sweep_observed(&plan, &oracle, &GridCsvWriter::new(&args.out))?
    } else {
        run_sweep(&plan, &oracle)?
    };
    let artifacts = persist_report(&args.out, &report)?;

    println!(
        "evaluated {} of {} configurations ({} skipped)",
        report.summary.evaluated,
        report.summary.enumerated,
        report.summary.skipped.len()
    );
    for (rank, result) in report.top_results().iter().enumerate() {
        println!("{:>3}. {} score={:.6}", rank + 1, result.config_name, result.score);
    }
    println!("results: {}", artifacts.results.display());
    println!("report: {}", artifacts.report.display());
    println!("comparison: {}", artifacts.comparison.display());
    Ok(())
}
