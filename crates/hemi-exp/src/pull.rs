use std::f64::consts::PI;

use hemi_core::errors::{ErrorInfo, HemiError, FIELD_EVALUATION, FIELD_NON_FINITE};
use hemi_core::{FieldOracle, GlobalOptimizer, SourceSpec, MU_0};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Settings of the single flat-coil pull-force estimate and its objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullForceConfig {
    /// On-axis air gap between coil face and target in m.
    #[serde(default = "PullForceConfig::default_gap")]
    pub gap: f64,
    /// Permeability `μ` in `F = B² A / (2 μ)`, in H/m.
    #[serde(default = "PullForceConfig::default_permeability")]
    pub permeability: f64,
    /// Cost per ampere of per-turn current.
    #[serde(default = "PullForceConfig::default_current_weight")]
    pub current_weight: f64,
    /// Cost per turn.
    #[serde(default = "PullForceConfig::default_turns_weight")]
    pub turns_weight: f64,
    /// Search range of the per-turn current in A.
    #[serde(default = "PullForceConfig::default_current_bounds")]
    pub current_bounds: (f64, f64),
    /// Search range of the turn count.
    #[serde(default = "PullForceConfig::default_turns_bounds")]
    pub turns_bounds: (f64, f64),
    /// Search range of the coil diameter in m.
    #[serde(default = "PullForceConfig::default_diameter_bounds")]
    pub diameter_bounds: (f64, f64),
}

impl PullForceConfig {
    const fn default_gap() -> f64 {
        0.001
    }

    fn default_permeability() -> f64 {
        MU_0 / 500.0
    }

    const fn default_current_weight() -> f64 {
        1.0
    }

    const fn default_turns_weight() -> f64 {
        0.1
    }

    const fn default_current_bounds() -> (f64, f64) {
        (0.1, 0.5)
    }

    const fn default_turns_bounds() -> (f64, f64) {
        (200.0, 1000.0)
    }

    const fn default_diameter_bounds() -> (f64, f64) {
        (0.01, 0.025)
    }

    /// Bounds of `[current, turns, diameter]` in optimizer order.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        vec![self.current_bounds, self.turns_bounds, self.diameter_bounds]
    }
}

impl Default for PullForceConfig {
    fn default() -> Self {
        Self {
            gap: Self::default_gap(),
            permeability: Self::default_permeability(),
            current_weight: Self::default_current_weight(),
            turns_weight: Self::default_turns_weight(),
            current_bounds: Self::default_current_bounds(),
            turns_bounds: Self::default_turns_bounds(),
            diameter_bounds: Self::default_diameter_bounds(),
        }
    }
}

/// Human readable result of the pull-force optimisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullForceDesign {
    /// Per-turn current in A.
    pub current: f64,
    /// Rounded turn count.
    pub turns: u32,
    /// Coil diameter in m.
    pub diameter: f64,
    /// Pull force in N at the rounded turn count.
    pub pull_force: f64,
    /// Best objective value reported by the optimizer.
    pub objective: f64,
    /// Whether the optimizer met its tolerance.
    pub converged: bool,
    /// Optimizer iterations.
    pub iterations: usize,
    /// Objective evaluations.
    pub evaluations: usize,
}

/// Rounds a continuous turn count to the nearest integer, ties to even.
pub fn round_turns(turns: f64) -> u32 {
    turns.round_ties_even().max(0.0) as u32
}

/// Pull force `|B|² π (D/2)² / (2 μ)` of a flat coil, with `B` the oracle
/// field at `(0, 0, gap)` of a single loop carrying `current × turns`.
pub fn pull_force(
    oracle: &dyn FieldOracle,
    current: f64,
    turns: u32,
    diameter: f64,
    config: &PullForceConfig,
) -> Result<f64, HemiError> {
    let source = SourceSpec::current_loop(current * f64::from(turns), diameter);
    let target = Vector3::new(0.0, 0.0, config.gap);
    let field = oracle
        .query(&[source], &[target])
        .map_err(|err| match err {
            HemiError::Field(info) => HemiError::Field(info),
            other => HemiError::Field(
                ErrorInfo::new(FIELD_EVALUATION, "field oracle query failed")
                    .with_context("cause", other.to_string()),
            ),
        })?
        .first()
        .copied()
        .ok_or_else(|| {
            HemiError::Field(ErrorInfo::new(
                FIELD_EVALUATION,
                "oracle returned no field for the pull target",
            ))
        })?;
    let area = PI * (diameter / 2.0).powi(2);
    let force = field.norm_squared() * area / (2.0 * config.permeability);
    if !force.is_finite() {
        return Err(HemiError::Field(
            ErrorInfo::new(FIELD_NON_FINITE, "pull force is not finite")
                .with_context("current", current.to_string())
                .with_context("turns", turns.to_string())
                .with_context("diameter", diameter.to_string()),
        ));
    }
    Ok(force)
}

/// Cost of `[current, turns, diameter]`: `-F + w1 current + w2 round(turns)`.
pub fn pull_objective(
    oracle: &dyn FieldOracle,
    params: &[f64],
    config: &PullForceConfig,
) -> Result<f64, HemiError> {
    let [current, turns, diameter] = params else {
        return Err(HemiError::Optimizer(
            ErrorInfo::new("optimizer-objective", "pull objective takes three parameters")
                .with_context("len", params.len().to_string()),
        ));
    };
    let turns = round_turns(*turns);
    let force = pull_force(oracle, *current, turns, *diameter, config)?;
    Ok(-force + config.current_weight * current + config.turns_weight * f64::from(turns))
}

/// Minimises [`pull_objective`] within the configured bounds and reports the
/// best design with its force recomputed at the rounded turn count.
pub fn optimize_pull_force(
    oracle: &dyn FieldOracle,
    optimizer: &mut dyn GlobalOptimizer,
    config: &PullForceConfig,
) -> Result<PullForceDesign, HemiError> {
    let bounds = config.bounds();
    info!(oracle = oracle.name(), "starting pull-force optimisation");
    let mut objective = |params: &[f64]| pull_objective(oracle, params, config);
    let outcome = optimizer.minimize(&mut objective, &bounds)?;
    if !outcome.converged {
        warn!(
            iterations = outcome.iterations,
            best = outcome.best_value,
            "optimizer exhausted its budget without converging"
        );
    }
    let [current, turns, diameter] = outcome.best_params[..] else {
        return Err(HemiError::Optimizer(
            ErrorInfo::new("optimizer-objective", "optimizer returned a malformed point")
                .with_context("len", outcome.best_params.len().to_string()),
        ));
    };
    let turns = round_turns(turns);
    let force = pull_force(oracle, current, turns, diameter, config)?;
    info!(current, turns, diameter, pull_force = force, "pull-force optimisation finished");
    Ok(PullForceDesign {
        current,
        turns,
        diameter,
        pull_force: force,
        objective: outcome.best_value,
        converged: outcome.converged,
        iterations: outcome.iterations,
        evaluations: outcome.evaluations,
    })
}
