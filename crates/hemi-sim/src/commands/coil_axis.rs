use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hemi_eval::linspace;
use hemi_exp::to_canonical_json_pretty;
use hemi_field::SpiralCoil;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CoilAxisArgs {
    /// Radius of the innermost turn in m.
    #[arg(long, default_value_t = 0.003)]
    pub inner_radius: f64,
    /// Radius of the outermost turn in m.
    #[arg(long, default_value_t = 0.0058)]
    pub outer_radius: f64,
    /// Number of turns.
    #[arg(long, default_value_t = 50)]
    pub turns: usize,
    /// Current in A.
    #[arg(long, default_value_t = 5.0)]
    pub current: f64,
    /// Distance of the single reported point in m.
    #[arg(long, default_value_t = 0.01)]
    pub z: f64,
    /// Profile start in m.
    #[arg(long, default_value_t = 0.01)]
    pub z_min: f64,
    /// Profile end in m.
    #[arg(long, default_value_t = 0.1)]
    pub z_max: f64,
    /// Profile samples.
    #[arg(long, default_value_t = 50)]
    pub samples: usize,
    /// Write the profile here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ProfilePoint {
    z: f64,
    field: f64,
}

#[derive(Debug, Serialize)]
struct AxisReport {
    coil: SpiralCoil,
    z: f64,
    field: f64,
    profile: Vec<ProfilePoint>,
}

pub fn run(args: &CoilAxisArgs) -> Result<(), Box<dyn Error>> {
    let coil = SpiralCoil {
        inner_radius: args.inner_radius,
        outer_radius: args.outer_radius,
        turns: args.turns,
        current: args.current,
    };
    let field = coil.axial_field(args.z)?;
    let zs = linspace(args.z_min, args.z_max, args.samples);
    let profile = coil
        .axial_profile(&zs)?
        .into_iter()
        .zip(zs)
        .map(|(field, z)| ProfilePoint { z, field })
        .collect();
    let report = AxisReport {
        coil,
        z: args.z,
        field,
        profile,
    };
    super::emit(args.out.as_deref(), &to_canonical_json_pretty(&report)?)
}
