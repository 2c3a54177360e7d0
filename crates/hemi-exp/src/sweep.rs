use std::collections::BTreeMap;

use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::{FieldOracle, RunProvenance};
use hemi_eval::{calculate_metrics, evaluate_views, EvaluationSettings, FieldViews, MetricsRecord};
use hemi_layout::{build_layout, DesignConfig, MagnetKind, PlacementParams};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::hash::stable_hash_string;
use crate::naming::config_name;
use crate::serde::from_yaml_slice;
use crate::space::{Candidate, ParameterSpace};

/// Scheduler configuration controlling sweep execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Worker threads; `1` evaluates sequentially.
    #[serde(default = "Scheduler::default_parallelism")]
    pub parallelism: usize,
}

impl Scheduler {
    const fn default_parallelism() -> usize {
        1
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            parallelism: Self::default_parallelism(),
        }
    }
}

/// Plan describing the placement, design space and evaluation of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Hemisphere placement shared by every design.
    #[serde(default)]
    pub system: PlacementParams,
    /// Design space to enumerate.
    #[serde(default)]
    pub space: ParameterSpace,
    /// Slice evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationSettings,
    /// Execution settings.
    #[serde(default)]
    pub scheduler: Scheduler,
    /// Number of best results surfaced in the report.
    #[serde(default = "SweepPlan::default_top_n")]
    pub top_n: usize,
}

impl SweepPlan {
    const fn default_top_n() -> usize {
        10
    }

    /// Loads a plan from YAML; missing sections take their defaults.
    pub fn from_yaml(data: &[u8]) -> Result<Self, HemiError> {
        from_yaml_slice(data)
    }

    /// Plan reduced to a single design.
    pub fn singleton(config: &DesignConfig) -> Self {
        Self {
            system: config.placement.clone(),
            space: ParameterSpace {
                magnet_kinds: vec![config.magnet_kind.as_str().to_string()],
                coil_diameters: vec![config.coil_diameter],
                currents: vec![config.current],
                turns: vec![config.turns],
                coil_heights: config.coil_height.into_iter().collect(),
                core_magnetizations: config.core_magnetization.into_iter().collect(),
            },
            ..Self::default()
        }
    }
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            system: PlacementParams::default(),
            space: ParameterSpace::default(),
            evaluation: EvaluationSettings::default(),
            scheduler: Scheduler::default(),
            top_n: Self::default_top_n(),
        }
    }
}

/// A scored design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Deterministic name of the design.
    pub config_name: String,
    /// Magnet variant.
    pub magnet_kind: MagnetKind,
    /// Full design.
    pub config: DesignConfig,
    /// Slice metrics.
    pub metrics: MetricsRecord,
    /// Composite score used for ranking.
    pub score: f64,
}

/// A configuration left out of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedConfig {
    /// Configuration name, or the unrecognised kind name.
    pub config_name: String,
    /// Error code of the failure.
    pub code: String,
    /// Error message of the failure.
    pub message: String,
}

/// Run-level counts of a sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Configurations enumerated, including skipped ones.
    pub enumerated: usize,
    /// Configurations scored.
    pub evaluated: usize,
    /// Skipped configurations in enumeration order.
    pub skipped: Vec<SkippedConfig>,
    /// Skip count per error code.
    pub skip_counts: BTreeMap<String, usize>,
}

/// Aggregate sweep report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Hash of the canonical plan.
    pub plan_hash: String,
    /// Provenance of the run.
    pub provenance: RunProvenance,
    /// Run-level counts.
    pub summary: SweepSummary,
    /// Names of the best `top_n` results.
    pub top: Vec<String>,
    /// All results, descending by score.
    pub results: Vec<SweepResult>,
}

impl SweepReport {
    /// The best `top_n` results.
    pub fn top_results(&self) -> &[SweepResult] {
        &self.results[..self.top.len().min(self.results.len())]
    }
}

/// Receives every evaluated configuration together with its slices.
///
/// With `parallelism > 1` calls arrive from worker threads in no particular
/// order. An error aborts the sweep.
pub trait SweepObserver: Sync {
    /// Called once per successfully evaluated configuration.
    fn on_evaluated(&self, result: &SweepResult, views: &FieldViews) -> Result<(), HemiError>;
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {
    fn on_evaluated(&self, _result: &SweepResult, _views: &FieldViews) -> Result<(), HemiError> {
        Ok(())
    }
}

/// Runs factory → layout → top/side slices → metrics for one design.
pub fn evaluate_design(
    oracle: &dyn FieldOracle,
    config: &DesignConfig,
    settings: &EvaluationSettings,
) -> Result<(MetricsRecord, FieldViews), HemiError> {
    let layout = build_layout(config)?;
    let views = evaluate_views(oracle, &layout.sources, config.placement.radius, settings)?;
    Ok((calculate_metrics(&views), views))
}

enum Outcome {
    Scored(SweepResult),
    Skipped(SkippedConfig),
}

fn skipped(config_name: String, err: &HemiError) -> Outcome {
    warn!(config = %config_name, code = err.code(), error = %err, "skipping configuration");
    Outcome::Skipped(SkippedConfig {
        config_name,
        code: err.code().to_string(),
        message: err.info().message.clone(),
    })
}

fn run_candidate(
    oracle: &dyn FieldOracle,
    candidate: &Candidate,
    settings: &EvaluationSettings,
    observer: &dyn SweepObserver,
) -> Result<Outcome, HemiError> {
    let config = match candidate {
        Candidate::Design(config) => config,
        Candidate::Invalid { label, error } => return Ok(skipped(label.clone(), error)),
    };
    let name = config_name(config);
    debug!(config = %name, "evaluating configuration");
    match evaluate_design(oracle, config, settings) {
        Ok((metrics, views)) => {
            let result = SweepResult {
                config_name: name,
                magnet_kind: config.magnet_kind,
                config: config.clone(),
                metrics,
                score: metrics.score,
            };
            observer.on_evaluated(&result, &views)?;
            Ok(Outcome::Scored(result))
        }
        Err(err) if err.is_recoverable() => Ok(skipped(name, &err)),
        Err(err) => Err(err.with_context("config", name)),
    }
}

/// Runs the sweep described by `plan` without observing slices.
pub fn run_sweep(plan: &SweepPlan, oracle: &dyn FieldOracle) -> Result<SweepReport, HemiError> {
    run_sweep_observed(plan, oracle, &NoopObserver)
}

/// Enumerates, evaluates and ranks every configuration of `plan`.
///
/// Design and field errors skip the configuration and are counted in the
/// summary. Results are sorted descending by score; ties keep enumeration
/// order, also when evaluation runs on several threads.
pub fn run_sweep_observed(
    plan: &SweepPlan,
    oracle: &dyn FieldOracle,
    observer: &dyn SweepObserver,
) -> Result<SweepReport, HemiError> {
    let plan_hash = stable_hash_string(plan)?;
    let candidates = plan.space.enumerate(&plan.system);
    info!(
        configurations = candidates.len(),
        parallelism = plan.scheduler.parallelism,
        oracle = oracle.name(),
        "starting design sweep"
    );

    let outcomes: Vec<Outcome> = if plan.scheduler.parallelism > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(plan.scheduler.parallelism)
            .build()
            .map_err(|err| {
                HemiError::Config(ErrorInfo::new("config-scheduler", err.to_string()))
            })?;
        pool.install(|| {
            candidates
                .par_iter()
                .map(|candidate| run_candidate(oracle, candidate, &plan.evaluation, observer))
                .collect::<Result<Vec<_>, _>>()
        })?
    } else {
        candidates
            .iter()
            .map(|candidate| run_candidate(oracle, candidate, &plan.evaluation, observer))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut summary = SweepSummary {
        enumerated: candidates.len(),
        ..SweepSummary::default()
    };
    let mut results = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Scored(result) => results.push(result),
            Outcome::Skipped(skip) => {
                *summary.skip_counts.entry(skip.code.clone()).or_default() += 1;
                summary.skipped.push(skip);
            }
        }
    }
    summary.evaluated = results.len();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top: Vec<String> = results
        .iter()
        .take(plan.top_n)
        .map(|result| result.config_name.clone())
        .collect();

    info!(
        evaluated = summary.evaluated,
        skipped = summary.skipped.len(),
        best = top.first().map(String::as_str).unwrap_or("-"),
        "design sweep finished"
    );
    Ok(SweepReport {
        provenance: RunProvenance::new(plan_hash.clone(), oracle.name()),
        plan_hash,
        summary,
        top,
        results,
    })
}
