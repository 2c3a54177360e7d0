//! Design sweeps, pull-force optimisation and result persistence for
//! hemisphere magnet arrays.

mod evolution;
mod hash;
mod naming;
pub mod persist;
mod pull;
mod serde;
mod space;
mod sweep;

pub use evolution::DifferentialEvolution;
pub use hash::stable_hash_string;
pub use naming::{config_name, parse_config_name};
pub use pull::{
    optimize_pull_force, pull_force, pull_objective, round_turns, PullForceConfig,
    PullForceDesign,
};
pub use space::{
    Axis, AxisValue, Candidate, ParameterSpace, AXIS_COIL_DIAMETER, AXIS_COIL_HEIGHT,
    AXIS_CORE_MAGNETIZATION, AXIS_CURRENT, AXIS_TURNS,
};
pub use sweep::{
    evaluate_design, run_sweep, run_sweep_observed, NoopObserver, Scheduler, SkippedConfig,
    SweepObserver, SweepPlan, SweepReport, SweepResult, SweepSummary,
};

pub use crate::serde::{
    from_json_slice, from_yaml_slice, to_canonical_json_bytes, to_canonical_json_pretty,
    to_yaml_string,
};
