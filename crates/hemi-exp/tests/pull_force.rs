use std::f64::consts::PI;
use std::sync::Mutex;

use hemi_core::errors::{ErrorInfo, HemiError, FIELD_EVALUATION, FIELD_NON_FINITE};
use hemi_core::{
    FieldOracle, GlobalOptimizer, Objective, OptimizationOutcome, SourceKind, SourceSpec, MU_0,
};
use hemi_exp::{
    optimize_pull_force, pull_force, pull_objective, round_turns, DifferentialEvolution,
    PullForceConfig,
};
use hemi_field::AnalyticOracle;
use nalgebra::Vector3;

/// Returns `(0, 0, b)` everywhere and records every query.
struct RecordingOracle {
    b: f64,
    queries: Mutex<Vec<(Vec<SourceSpec>, Vec<Vector3<f64>>)>>,
}

impl RecordingOracle {
    fn new(b: f64) -> Self {
        Self {
            b,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl FieldOracle for RecordingOracle {
    fn name(&self) -> &str {
        "recording"
    }

    fn query(
        &self,
        sources: &[SourceSpec],
        points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        self.queries
            .lock()
            .expect("lock")
            .push((sources.to_vec(), points.to_vec()));
        Ok(vec![Vector3::new(0.0, 0.0, self.b); points.len()])
    }
}

struct BrokenOracle;

impl FieldOracle for BrokenOracle {
    fn name(&self) -> &str {
        "broken"
    }

    fn query(
        &self,
        _sources: &[SourceSpec],
        _points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        Err(HemiError::Config(ErrorInfo::new("config-backend", "backend offline")))
    }
}

/// Optimizer that reports a fixed point without evaluating anything.
struct FixedOptimizer(Vec<f64>);

impl GlobalOptimizer for FixedOptimizer {
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        _bounds: &[(f64, f64)],
    ) -> Result<OptimizationOutcome, HemiError> {
        let best_value = objective(&self.0)?;
        Ok(OptimizationOutcome {
            best_params: self.0.clone(),
            best_value,
            converged: false,
            iterations: 7,
            evaluations: 1,
        })
    }
}

fn vacuum_config() -> PullForceConfig {
    PullForceConfig {
        permeability: MU_0,
        ..PullForceConfig::default()
    }
}

#[test]
fn defaults_follow_the_reference_design() {
    let config = PullForceConfig::default();
    assert_eq!(config.gap, 0.001);
    assert!((config.permeability - MU_0 / 500.0).abs() < 1e-24);
    assert_eq!(config.bounds(), vec![(0.1, 0.5), (200.0, 1000.0), (0.01, 0.025)]);
}

#[test]
fn force_follows_the_maxwell_pressure_formula() {
    let oracle = RecordingOracle::new(0.01);
    let config = vacuum_config();
    let force = pull_force(&oracle, 0.3, 200, 0.02, &config).expect("force");
    let expected = 0.01_f64.powi(2) * PI * 0.01_f64.powi(2) / (2.0 * MU_0);
    assert!((force - expected).abs() <= 1e-12 * expected);

    let queries = oracle.queries.lock().expect("lock");
    assert_eq!(queries.len(), 1);
    let (sources, points) = &queries[0];
    assert_eq!(points, &vec![Vector3::new(0.0, 0.0, 0.001)]);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].position, Vector3::zeros());
    match sources[0].kind {
        SourceKind::CurrentLoop { current, diameter } => {
            assert!((current - 60.0).abs() < 1e-12);
            assert_eq!(diameter, 0.02);
        }
        ref other => panic!("expected a current loop, got {other:?}"),
    }
}

#[test]
fn analytic_force_grows_with_ampere_turns() {
    let oracle = AnalyticOracle::new();
    let config = PullForceConfig::default();
    let low = pull_force(&oracle, 0.2, 300, 0.02, &config).expect("force");
    let high = pull_force(&oracle, 0.4, 300, 0.02, &config).expect("force");
    assert!(low > 0.0);
    assert!((high / low - 4.0).abs() < 1e-9);
}

#[test]
fn turns_round_half_to_even() {
    assert_eq!(round_turns(200.4), 200);
    assert_eq!(round_turns(200.5), 200);
    assert_eq!(round_turns(201.5), 202);
    assert_eq!(round_turns(999.7), 1000);
}

#[test]
fn objective_uses_the_rounded_turn_count() {
    let oracle = RecordingOracle::new(0.02);
    let config = vacuum_config();
    let value = pull_objective(&oracle, &[0.3, 200.5, 0.02], &config).expect("objective");
    let force = pull_force(&oracle, 0.3, 200, 0.02, &config).expect("force");
    let expected = -force + 0.3 + 0.1 * 200.0;
    assert!((value - expected).abs() < 1e-9 * expected.abs().max(1.0));

    let err = pull_objective(&oracle, &[0.3, 200.0], &config).expect_err("arity");
    assert_eq!(err.code(), "optimizer-objective");
}

#[test]
fn oracle_failures_surface_as_field_errors() {
    let err = pull_force(&BrokenOracle, 0.3, 200, 0.02, &vacuum_config()).expect_err("fails");
    assert!(matches!(err, HemiError::Field(_)));
    assert_eq!(err.code(), FIELD_EVALUATION);

    let oracle = RecordingOracle::new(f64::NAN);
    let err = pull_force(&oracle, 0.3, 200, 0.02, &vacuum_config()).expect_err("nan");
    assert_eq!(err.code(), FIELD_NON_FINITE);
}

#[test]
fn optimized_design_is_reported_at_rounded_turns() {
    let oracle = RecordingOracle::new(0.05);
    let config = vacuum_config();
    let mut optimizer = FixedOptimizer(vec![0.25, 499.5, 0.015]);
    let design = optimize_pull_force(&oracle, &mut optimizer, &config).expect("design");
    assert_eq!(design.turns, 500);
    assert_eq!(design.current, 0.25);
    assert_eq!(design.diameter, 0.015);
    assert!(!design.converged);
    assert_eq!(design.iterations, 7);
    assert_eq!(design.evaluations, 1);
    let force = pull_force(&oracle, 0.25, 500, 0.015, &config).expect("force");
    assert_eq!(design.pull_force, force);
}

#[test]
fn evolution_search_stays_in_bounds_and_is_seeded() {
    let oracle = AnalyticOracle::new();
    let config = PullForceConfig::default();
    let settings = DifferentialEvolution {
        max_iterations: 5,
        ..DifferentialEvolution::with_seed(17)
    };
    let first = optimize_pull_force(&oracle, &mut settings.clone(), &config).expect("design");
    let second = optimize_pull_force(&oracle, &mut settings.clone(), &config).expect("design");
    assert_eq!(first, second);
    assert!((0.1..=0.5).contains(&first.current));
    assert!((200..=1000).contains(&first.turns));
    assert!((0.01..=0.025).contains(&first.diameter));
    assert!(first.pull_force > 0.0);
    assert!(first.iterations <= 5);
}
