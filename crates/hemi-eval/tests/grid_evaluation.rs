use hemi_core::errors::{
    ErrorInfo, HemiError, FIELD_DEGENERATE_SOURCE, FIELD_EVALUATION, FIELD_NON_FINITE, FIELD_SHAPE,
};
use hemi_core::{FieldOracle, SourceSpec};
use hemi_eval::{
    evaluate_grid, evaluate_points, evaluate_views, EvaluationSettings, FieldUnits, PlanePair,
};
use hemi_field::AnalyticOracle;
use hemi_layout::{build_layout, DesignConfig, PlacementParams};
use nalgebra::Vector3;

/// Oracle returning a fixed vector everywhere.
struct ConstantOracle(Vector3<f64>);

impl FieldOracle for ConstantOracle {
    fn name(&self) -> &str {
        "constant"
    }

    fn query(
        &self,
        _sources: &[SourceSpec],
        points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        Ok(vec![self.0; points.len()])
    }
}

struct FailingOracle;

impl FieldOracle for FailingOracle {
    fn name(&self) -> &str {
        "failing"
    }

    fn query(
        &self,
        _sources: &[SourceSpec],
        _points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        Err(HemiError::Config(ErrorInfo::new("config-backend", "backend offline")))
    }
}

struct ShortOracle;

impl FieldOracle for ShortOracle {
    fn name(&self) -> &str {
        "short"
    }

    fn query(
        &self,
        _sources: &[SourceSpec],
        points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        Ok(vec![Vector3::zeros(); points.len().saturating_sub(1)])
    }
}

/// Radius 0.03 stays off the 9- and 10-point meshes over ±0.1.
fn loop_source() -> Vec<SourceSpec> {
    vec![SourceSpec::current_loop(75.0, 0.06)]
}

#[test]
fn slice_mesh_and_scaling() {
    let oracle = AnalyticOracle::new();
    let units = FieldUnits::default();
    let grid = evaluate_grid(&oracle, &loop_source(), PlanePair::Side, 0.1, 9, &units)
        .expect("grid");
    assert_eq!(grid.axis1().len(), 9);
    assert_eq!(grid.axis2().len(), 9);
    assert_eq!(grid.field().len(), 81);
    assert_eq!(grid.axis1()[0], -0.1);
    assert_eq!(grid.axis1()[8], 0.1);

    // Row i2, column i1 maps to (x = axis1[i1], z = axis2[i2]) on the side view.
    let (i1, i2) = (2, 6);
    let point = Vector3::new(grid.axis1()[i1], 0.0, grid.axis2()[i2]);
    let direct = oracle.query(&loop_source(), &[point]).expect("direct")[0];
    let scaled = grid.field()[i2 * 9 + i1];
    assert!((scaled - direct * 1e-3).norm() <= 1e-15);
    let energy = grid.energy()[i2 * 9 + i1];
    assert!((energy - 0.5 * scaled.norm_squared()).abs() <= 1e-24);
}

#[test]
fn top_slice_of_centred_loop_is_symmetric() {
    let oracle = AnalyticOracle::new();
    let grid = evaluate_grid(&oracle, &loop_source(), PlanePair::Top, 0.1, 10, &FieldUnits::tesla())
        .expect("grid");
    let energy = grid.energy();
    for i2 in 0..10 {
        for i1 in 0..10 {
            let mirrored = (9 - i2) * 10 + (9 - i1);
            let a = energy[i2 * 10 + i1];
            let b = energy[mirrored];
            assert!((a - b).abs() <= 1e-9 * a.abs().max(b.abs()));
        }
    }
}

#[test]
fn uniform_field_has_no_force() {
    let oracle = ConstantOracle(Vector3::new(0.0, 2.0, 0.0));
    let grid = evaluate_grid(&oracle, &[], PlanePair::Top, 1.0, 5, &FieldUnits::tesla())
        .expect("grid");
    assert!(grid.energy().iter().all(|e| *e == 2.0));
    assert!(grid.force_magnitude().iter().all(|f| f.abs() < 1e-9));
}

#[test]
fn invalid_mesh_is_a_config_error() {
    let oracle = ConstantOracle(Vector3::zeros());
    let units = FieldUnits::default();
    let err = evaluate_grid(&oracle, &[], PlanePair::Top, 0.1, 1, &units).expect_err("resolution");
    assert_eq!(err.code(), "config-resolution");
    let err = evaluate_grid(&oracle, &[], PlanePair::Top, 0.0, 10, &units).expect_err("length");
    assert_eq!(err.code(), "config-grid-length");
}

#[test]
fn oracle_failures_become_field_errors() {
    let units = FieldUnits::default();
    let err = evaluate_grid(&FailingOracle, &[], PlanePair::Top, 0.1, 4, &units)
        .expect_err("failing oracle");
    assert!(matches!(err, HemiError::Field(_)));
    assert_eq!(err.code(), FIELD_EVALUATION);
    assert!(err.is_recoverable());

    let nan = ConstantOracle(Vector3::new(f64::NAN, 0.0, 0.0));
    let err = evaluate_grid(&nan, &[], PlanePair::Top, 0.1, 4, &units).expect_err("nan");
    assert_eq!(err.code(), FIELD_NON_FINITE);

    let inf = ConstantOracle(Vector3::new(0.0, 0.0, f64::INFINITY));
    let err = evaluate_grid(&inf, &[], PlanePair::Side, 0.1, 4, &units).expect_err("inf");
    assert_eq!(err.code(), FIELD_NON_FINITE);
    assert_eq!(err.info().context.get("plane").map(String::as_str), Some("side"));

    let err = evaluate_grid(&ShortOracle, &[], PlanePair::Top, 0.1, 4, &units)
        .expect_err("short");
    assert_eq!(err.code(), FIELD_SHAPE);
}

#[test]
fn mesh_node_on_the_wire_is_degenerate() {
    // The 9-point side mesh over ±0.1 samples (±0.025, 0, 0).
    let sources = vec![SourceSpec::current_loop(75.0, 0.05)];
    let err = evaluate_grid(
        &AnalyticOracle::new(),
        &sources,
        PlanePair::Side,
        0.1,
        9,
        &FieldUnits::default(),
    )
    .expect_err("node on wire");
    assert_eq!(err.code(), FIELD_DEGENERATE_SOURCE);
    assert!(err.is_recoverable());
    assert_eq!(err.info().context.get("oracle").map(String::as_str), Some("analytic"));
}

#[test]
fn views_use_scaled_grid_length() {
    let oracle = ConstantOracle(Vector3::new(0.0, 0.0, 1.0));
    let settings = EvaluationSettings {
        resolution: 6,
        ..EvaluationSettings::default()
    };
    let views = evaluate_views(&oracle, &[], 0.1, &settings).expect("views");
    assert_eq!(views.top.plane(), PlanePair::Top);
    assert_eq!(views.side.plane(), PlanePair::Side);
    assert!((views.top.axis1()[5] - 0.125).abs() < 1e-15);
    assert_eq!(views.top.field().len(), 36);
}

#[test]
fn sensors_are_evaluated_in_order() {
    let placement = PlacementParams {
        n_elevation: 2,
        n_azimuth: 4,
        ..PlacementParams::default()
    };
    let layout = build_layout(&DesignConfig::flat_coil(0.5, 250, 0.03, placement))
        .expect("layout");
    let oracle = AnalyticOracle::new();
    let units = FieldUnits::default();
    let probes = evaluate_points(&oracle, &layout.sources, &layout.sensors, &units)
        .expect("probes");
    assert_eq!(probes.len(), layout.sensors.len());
    let raw = oracle
        .query(&layout.sources, &layout.sensor_positions())
        .expect("raw");
    for (probe, raw) in probes.iter().zip(&raw) {
        assert!((probe.field - raw * 1e-3).norm() <= 1e-15);
        assert!((probe.magnitude - probe.field.norm()).abs() <= 1e-18);
    }
}
