pub mod coil_axis;
pub mod layout;
pub mod optimize;
pub mod probe;
pub mod sweep;
pub mod version;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use hemi_exp::{from_yaml_slice, parse_config_name};
use hemi_layout::{DesignConfig, PlacementParams};

/// Selects the design a single-design command works on.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct DesignSelector {
    /// YAML file holding a full design.
    #[arg(long)]
    pub design: Option<PathBuf>,
    /// Configuration name as written by `hemi-sim sweep`.
    #[arg(long)]
    pub name: Option<String>,
}

impl DesignSelector {
    /// Loads the selected design. `placement` replaces the placement of a
    /// design file and completes a configuration name.
    pub fn load(&self, placement: Option<&Path>) -> Result<DesignConfig, Box<dyn Error>> {
        let placement = placement
            .map(|path| -> Result<PlacementParams, Box<dyn Error>> {
                Ok(from_yaml_slice(&fs::read(path)?)?)
            })
            .transpose()?;
        match (&self.design, &self.name) {
            (Some(path), _) => {
                let mut config: DesignConfig = from_yaml_slice(&fs::read(path)?)?;
                if let Some(placement) = placement {
                    config.placement = placement;
                }
                Ok(config)
            }
            (None, Some(name)) => Ok(parse_config_name(name, &placement.unwrap_or_default())?),
            (None, None) => Err("either --design or --name is required".into()),
        }
    }
}

/// Writes `bytes` to `out`, or to stdout when no path is given.
pub fn emit(out: Option<&Path>, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        None => println!("{}", String::from_utf8_lossy(bytes)),
    }
    Ok(())
}
