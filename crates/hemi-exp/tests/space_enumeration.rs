use hemi_exp::{config_name, Candidate, ParameterSpace, SweepPlan};
use hemi_layout::{MagnetKind, PlacementParams};

fn names(space: &ParameterSpace) -> Vec<String> {
    space
        .enumerate(&PlacementParams::default())
        .iter()
        .map(|candidate| match candidate {
            Candidate::Design(config) => config_name(config),
            Candidate::Invalid { label, .. } => format!("invalid:{label}"),
        })
        .collect()
}

#[test]
fn default_space_matches_the_historical_sweep() {
    let space = ParameterSpace::default();
    assert_eq!(space.len(), 27 + 108);
    let names = names(&space);
    assert_eq!(names.len(), 135);
    assert_eq!(names[0], "SimpleCoil_d0.03_c0.3_t150");
    assert_eq!(names[1], "SimpleCoil_d0.03_c0.3_t250");
    assert_eq!(names[3], "SimpleCoil_d0.03_c0.5_t150");
    assert_eq!(names[26], "SimpleCoil_d0.07_c0.7_t350");
    assert_eq!(names[27], "CoilCyl_d0.03_c0.3_t150_h0.01_m1");
    assert_eq!(names[28], "CoilCyl_d0.03_c0.3_t150_h0.01_m1.5");
    assert_eq!(names[29], "CoilCyl_d0.03_c0.3_t150_h0.02_m1");
    assert_eq!(names[134], "CoilCyl_d0.07_c0.7_t350_h0.02_m1.5");
}

#[test]
fn flat_coils_ignore_core_axes() {
    let space = ParameterSpace {
        magnet_kinds: vec!["SimpleCoil".into()],
        coil_heights: vec![0.01, 0.02, 0.03],
        ..ParameterSpace::default()
    };
    assert_eq!(space.axes_for(MagnetKind::FlatCoil).len(), 3);
    assert_eq!(space.axes_for(MagnetKind::CoilWithCore).len(), 5);
    assert_eq!(space.len(), 27);
}

#[test]
fn unknown_kind_becomes_one_invalid_candidate() {
    let space = ParameterSpace {
        magnet_kinds: vec!["HollowCylinder".into(), "SimpleCoil".into()],
        coil_diameters: vec![0.03],
        currents: vec![0.3],
        turns: vec![150],
        ..ParameterSpace::default()
    };
    assert_eq!(
        names(&space),
        vec![
            "invalid:HollowCylinder".to_string(),
            "SimpleCoil_d0.03_c0.3_t150".to_string()
        ]
    );
}

#[test]
fn empty_axis_enumerates_nothing() {
    let space = ParameterSpace {
        currents: Vec::new(),
        ..ParameterSpace::default()
    };
    assert!(space.is_empty());
    assert!(space.enumerate(&PlacementParams::default()).is_empty());
}

#[test]
fn yaml_plan_overrides_and_defaults() {
    let yaml = br#"
system:
  radius: 0.12
  n_azimuth: 6
space:
  magnet_kinds: [CoilCylinder]
  turns: [100]
evaluation:
  resolution: 30
scheduler:
  parallelism: 4
"#;
    let plan = SweepPlan::from_yaml(yaml).expect("plan");
    assert_eq!(plan.system.radius, 0.12);
    assert_eq!(plan.system.n_azimuth, 6);
    assert_eq!(plan.system.n_elevation, 4);
    assert_eq!(plan.space.turns, vec![100]);
    assert_eq!(plan.space.coil_diameters, vec![0.03, 0.05, 0.07]);
    assert_eq!(plan.evaluation.resolution, 30);
    assert_eq!(plan.evaluation.grid_scale, 1.25);
    assert_eq!(plan.evaluation.units.field_scale, 1e-3);
    assert_eq!(plan.scheduler.parallelism, 4);
    assert_eq!(plan.top_n, 10);
    assert_eq!(plan.space.len(), 3 * 3 * 2 * 2);
}

#[test]
fn empty_yaml_is_the_default_plan() {
    let plan = SweepPlan::from_yaml(b"{}").expect("plan");
    assert_eq!(plan, SweepPlan::default());
    let err = SweepPlan::from_yaml(b"top_n: [1").expect_err("malformed");
    assert_eq!(err.code(), "yaml-deserialize");
}
