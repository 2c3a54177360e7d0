use hemi_core::errors::INVALID_DESIGN_KIND;
use hemi_eval::EvaluationSettings;
use hemi_exp::{config_name, evaluate_design, parse_config_name, Candidate, ParameterSpace};
use hemi_field::AnalyticOracle;
use hemi_layout::{DesignConfig, PlacementParams, SensorOffsetSets};
use proptest::prelude::*;

fn small_placement() -> PlacementParams {
    PlacementParams {
        radius: 0.1,
        n_elevation: 2,
        n_azimuth: 4,
        sensor_offsets: SensorOffsetSets::canonical(),
        ..PlacementParams::default()
    }
}

#[test]
fn names_follow_the_historical_format() {
    let placement = PlacementParams::default();
    let flat = DesignConfig::flat_coil(0.5, 250, 0.05, placement.clone());
    assert_eq!(config_name(&flat), "SimpleCoil_d0.05_c0.5_t250");
    let cored = DesignConfig::coil_with_core(0.7, 350, 0.07, 0.02, [0.0, 0.0, 1.5], placement);
    assert_eq!(config_name(&cored), "CoilCyl_d0.07_c0.7_t350_h0.02_m1.5");
}

#[test]
fn every_default_candidate_round_trips() {
    let placement = PlacementParams::default();
    for candidate in ParameterSpace::default().enumerate(&placement) {
        let Candidate::Design(config) = candidate else {
            panic!("default space has only known kinds");
        };
        let parsed = parse_config_name(&config_name(&config), &placement).expect("parse");
        assert_eq!(parsed, config);
    }
}

#[test]
fn tilted_magnetization_keeps_all_components() {
    let config = DesignConfig::coil_with_core(
        0.3,
        150,
        0.03,
        0.01,
        [0.5, -0.25, 1.0],
        PlacementParams::default(),
    );
    let name = config_name(&config);
    assert_eq!(name, "CoilCyl_d0.03_c0.3_t150_h0.01_m0.5,-0.25,1");
    assert_eq!(
        parse_config_name(&name, &PlacementParams::default()).expect("parse"),
        config
    );
}

#[test]
fn rebuilt_design_reproduces_identical_metrics() {
    let oracle = AnalyticOracle::new();
    let settings = EvaluationSettings {
        resolution: 12,
        ..EvaluationSettings::default()
    };
    let placement = small_placement();
    let config =
        DesignConfig::coil_with_core(0.5, 250, 0.05, 0.02, [0.0, 0.0, 1.0], placement.clone());
    let (metrics, _) = evaluate_design(&oracle, &config, &settings).expect("metrics");
    let rebuilt = parse_config_name(&config_name(&config), &placement).expect("parse");
    let (again, _) = evaluate_design(&oracle, &rebuilt, &settings).expect("metrics");
    assert_eq!(metrics, again);
}

#[test]
fn malformed_names_are_rejected() {
    let placement = PlacementParams::default();
    let err = parse_config_name("Hollow_d0.03_c0.3_t150", &placement).expect_err("prefix");
    assert_eq!(err.code(), INVALID_DESIGN_KIND);
    let err = parse_config_name("SimpleCoil_d0.03_c0.3", &placement).expect_err("turns");
    assert_eq!(err.code(), "config-name");
    let err = parse_config_name("SimpleCoil_d0.03_cx_t150", &placement).expect_err("current");
    assert_eq!(err.code(), "config-name");
    let err = parse_config_name("CoilCyl_d0.03_c0.3_t150_h0.01", &placement).expect_err("m");
    assert_eq!(err.code(), "config-name");
    let err = parse_config_name("SimpleCoil_d0.03_c0.3_t150_q1", &placement).expect_err("token");
    assert_eq!(err.code(), "config-name");
}

proptest! {
    #[test]
    fn arbitrary_designs_round_trip(
        current in 1e-3f64..10.0,
        turns in 1u32..5000,
        diameter in 1e-3f64..0.5,
        height in 1e-3f64..0.1,
        mx in -2.0f64..2.0,
        mz in -2.0f64..2.0,
        cored in any::<bool>(),
    ) {
        let placement = PlacementParams::default();
        let config = if cored {
            DesignConfig::coil_with_core(
                current,
                turns,
                diameter,
                height,
                [mx, 0.0, mz],
                placement.clone(),
            )
        } else {
            DesignConfig::flat_coil(current, turns, diameter, placement.clone())
        };
        let parsed = parse_config_name(&config_name(&config), &placement).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
