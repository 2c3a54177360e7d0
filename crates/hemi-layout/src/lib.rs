#![deny(missing_docs)]
#![doc = "Magnet source factory and hemisphere layout generation."]

/// Magnet variants and design configuration.
pub mod design;
/// Builds source descriptors for a design.
pub mod factory;
/// Sensor and source placement over a hemisphere shell.
pub mod hemisphere;
/// Pole alignment onto radial directions.
pub mod orientation;

pub use design::{DesignConfig, MagnetKind, PlacementParams, SensorOffsetSets};
pub use factory::build_sources;
pub use hemisphere::{
    azimuth_values, build_layout, elevation_values, generate_layout, spherical_to_cartesian,
    HemisphereLayout,
};
pub use orientation::{align_pole_to, ALIGNMENT_TOLERANCE};
