use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use hemi_core::{FieldOracle, RunProvenance};
use hemi_exp::{
    from_yaml_slice, optimize_pull_force, stable_hash_string, to_canonical_json_pretty,
    DifferentialEvolution, PullForceConfig, PullForceDesign,
};
use hemi_field::AnalyticOracle;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// YAML file with `pull` and `optimizer` sections.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Optimizer seed, overriding the settings file.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Generation budget, overriding the settings file.
    #[arg(long)]
    pub max_iterations: Option<usize>,
    /// Air gap in m, overriding the settings file.
    #[arg(long)]
    pub gap: Option<f64>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OptimizeSettings {
    #[serde(default)]
    pull: PullForceConfig,
    #[serde(default)]
    optimizer: DifferentialEvolution,
}

#[derive(Debug, Serialize)]
struct OptimizeReport<'a> {
    provenance: RunProvenance,
    settings: &'a OptimizeSettings,
    design: PullForceDesign,
}

pub fn run(args: &OptimizeArgs) -> Result<(), Box<dyn Error>> {
    let mut settings: OptimizeSettings = match &args.config {
        Some(path) => from_yaml_slice(&fs::read(path)?)?,
        None => OptimizeSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.optimizer.seed = seed;
    }
    if let Some(max_iterations) = args.max_iterations {
        settings.optimizer.max_iterations = max_iterations;
    }
    if let Some(gap) = args.gap {
        settings.pull.gap = gap;
    }

    let oracle = AnalyticOracle::new();
    let mut optimizer = settings.optimizer.clone();
    let design = optimize_pull_force(&oracle, &mut optimizer, &settings.pull)?;
    let report = OptimizeReport {
        provenance: RunProvenance::new(stable_hash_string(&settings)?, oracle.name())
            .with_seed(settings.optimizer.seed),
        settings: &settings,
        design,
    };
    super::emit(args.out.as_deref(), &to_canonical_json_pretty(&report)?)
}
