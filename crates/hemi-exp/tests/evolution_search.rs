use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::GlobalOptimizer;
use hemi_exp::DifferentialEvolution;

fn shifted_sphere(params: &[f64]) -> Result<f64, HemiError> {
    let centre = [1.5, -0.75];
    Ok(1.0 + params.iter().zip(centre).map(|(x, c)| (x - c).powi(2)).sum::<f64>())
}

#[test]
fn converges_on_a_shifted_sphere() {
    let mut optimizer = DifferentialEvolution::with_seed(3);
    let outcome = optimizer
        .minimize(&mut shifted_sphere, &[(-5.0, 5.0), (-5.0, 5.0)])
        .expect("outcome");
    assert!(outcome.converged);
    assert!(outcome.iterations < 10_000);
    assert!((outcome.best_params[0] - 1.5).abs() < 1e-2);
    assert!((outcome.best_params[1] + 0.75).abs() < 1e-2);
    assert!(outcome.best_value < 1.0 + 1e-4);
    assert_eq!(outcome.evaluations, 30 * (outcome.iterations + 1));
}

#[test]
fn same_seed_same_outcome() {
    let bounds = [(-5.0, 5.0), (-5.0, 5.0)];
    let run = |seed| {
        DifferentialEvolution {
            max_iterations: 20,
            ..DifferentialEvolution::with_seed(seed)
        }
        .minimize(&mut shifted_sphere, &bounds)
        .expect("outcome")
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn budget_exhaustion_is_not_an_error() {
    let mut optimizer = DifferentialEvolution {
        max_iterations: 1,
        ..DifferentialEvolution::with_seed(5)
    };
    let outcome = optimizer
        .minimize(&mut shifted_sphere, &[(-5.0, 5.0), (-5.0, 5.0)])
        .expect("outcome");
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.evaluations, 60);
    for (value, (lo, hi)) in outcome.best_params.iter().zip([(-5.0, 5.0), (-5.0, 5.0)]) {
        assert!((lo..=hi).contains(value));
    }
}

#[test]
fn collapsed_bounds_converge_immediately() {
    let mut optimizer = DifferentialEvolution::with_seed(0);
    let outcome = optimizer
        .minimize(&mut shifted_sphere, &[(1.0, 1.0), (2.0, 2.0)])
        .expect("outcome");
    assert_eq!(outcome.best_params, vec![1.0, 2.0]);
    assert!(outcome.converged);
    assert_eq!(outcome.iterations, 1);
}

#[test]
fn invalid_bounds_are_rejected() {
    let mut optimizer = DifferentialEvolution::default();
    for bounds in [vec![], vec![(1.0, 0.0)], vec![(0.0, f64::NAN)]] {
        let err = optimizer
            .minimize(&mut shifted_sphere, &bounds)
            .expect_err("bounds");
        assert_eq!(err.code(), "optimizer-bounds");
    }
}

#[test]
fn objective_errors_abort_the_search() {
    let mut calls = 0;
    let mut objective = |params: &[f64]| {
        calls += 1;
        if calls > 10 {
            return Err(HemiError::Field(ErrorInfo::new("field-evaluation", "lost oracle")));
        }
        shifted_sphere(params)
    };
    let err = DifferentialEvolution::with_seed(1)
        .minimize(&mut objective, &[(-1.0, 1.0)])
        .expect_err("objective failure");
    assert_eq!(err.code(), "field-evaluation");
}

#[test]
fn settings_deserialize_with_defaults() {
    let settings: DifferentialEvolution = serde_json::from_str(r#"{"seed": 9}"#).expect("json");
    assert_eq!(settings, DifferentialEvolution::with_seed(9));
}
