use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hemi_core::{SensorSpec, SourceSpec};
use hemi_exp::{config_name, to_canonical_json_pretty};
use hemi_layout::build_layout;
use serde::Serialize;

use super::DesignSelector;

#[derive(Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub selector: DesignSelector,
    /// YAML placement overriding the design's placement.
    #[arg(long)]
    pub placement: Option<PathBuf>,
    /// Write the layout here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct LayoutDocument<'a> {
    config_name: String,
    loops: usize,
    sources: &'a [SourceSpec],
    sensors: &'a [SensorSpec],
}

pub fn run(args: &LayoutArgs) -> Result<(), Box<dyn Error>> {
    let config = args.selector.load(args.placement.as_deref())?;
    let layout = build_layout(&config)?;
    let document = LayoutDocument {
        config_name: config_name(&config),
        loops: layout.loop_count(),
        sources: &layout.sources,
        sensors: &layout.sensors,
    };
    super::emit(args.out.as_deref(), &to_canonical_json_pretty(&document)?)
}
