use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Args;
use hemi_eval::{evaluate_points, FieldUnits};
use hemi_field::AnalyticOracle;
use hemi_layout::build_layout;
use tracing::info;

use super::DesignSelector;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub selector: DesignSelector,
    /// YAML placement overriding the design's placement.
    #[arg(long)]
    pub placement: Option<PathBuf>,
    /// Factor applied to every oracle vector.
    #[arg(long, default_value_t = 1e-3)]
    pub field_scale: f64,
    /// Write the sensor table here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ProbeArgs) -> Result<(), Box<dyn Error>> {
    let config = args.selector.load(args.placement.as_deref())?;
    let layout = build_layout(&config)?;
    let units = FieldUnits {
        field_scale: args.field_scale,
    };
    let fields = evaluate_points(&AnalyticOracle::new(), &layout.sources, &layout.sensors, &units)?;
    info!(sensors = fields.len(), "probed sensors");

    let sink: Box<dyn io::Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Box::new(fs::File::create(path)?)
        }
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record([
        "sensor", "x", "y", "z", "bx", "by", "bz", "magnitude", "source_index",
    ])?;
    for (idx, (sensor, point)) in layout.sensors.iter().zip(&fields).enumerate() {
        writer.write_record([
            idx.to_string(),
            point.position.x.to_string(),
            point.position.y.to_string(),
            point.position.z.to_string(),
            point.field.x.to_string(),
            point.field.y.to_string(),
            point.field.z.to_string(),
            point.magnitude.to_string(),
            sensor
                .source_index
                .map(|index| index.to_string())
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
