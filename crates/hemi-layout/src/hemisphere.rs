use std::f64::consts::{FRAC_PI_2, PI};

use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::{SensorOffsets, SensorSpec, SourceKind, SourceSpec};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::design::{DesignConfig, PlacementParams};
use crate::factory::build_sources;
use crate::orientation::align_pole_to;

/// Placed sources and sensors of one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemisphereLayout {
    /// Placed sources, grouped per angular cell.
    pub sources: Vec<SourceSpec>,
    /// Sensors in generation order.
    pub sensors: Vec<SensorSpec>,
}

impl HemisphereLayout {
    /// Number of placed current loops.
    pub fn loop_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|source| matches!(source.kind, SourceKind::CurrentLoop { .. }))
            .count()
    }

    /// Sensor positions in generation order.
    pub fn sensor_positions(&self) -> Vec<Vector3<f64>> {
        self.sensors.iter().map(|sensor| sensor.position).collect()
    }
}

/// `n` elevation angles evenly spaced over `[0, π/2]`, both ends included.
pub fn elevation_values(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = FRAC_PI_2 / (n - 1) as f64;
            (0..n).map(|idx| step * idx as f64).collect()
        }
    }
}

/// `n` azimuth angles evenly spaced over `[0, 2π)`.
pub fn azimuth_values(n: usize) -> Vec<f64> {
    let step = 2.0 * PI / n as f64;
    (0..n).map(|idx| step * idx as f64).collect()
}

/// Cartesian point at `radius`, polar angle `elevation` from +Z and `azimuth`.
pub fn spherical_to_cartesian(radius: f64, elevation: f64, azimuth: f64) -> Vector3<f64> {
    let (sin_el, cos_el) = elevation.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();
    Vector3::new(
        radius * sin_el * cos_az,
        radius * sin_el * sin_az,
        radius * cos_el,
    )
}

fn config_error(code: &str, message: &str) -> HemiError {
    HemiError::Config(ErrorInfo::new(code, message))
}

fn check_offsets(name: &str, values: &[f64]) -> Result<(), HemiError> {
    if values.iter().any(|value| !value.is_finite()) {
        return Err(config_error("config-offsets", "sensor offsets must be finite")
            .with_context("set", name));
    }
    let zeros = values.iter().filter(|value| **value == 0.0).count();
    if zeros != 1 {
        return Err(config_error(
            "config-offsets",
            "each sensor offset set must contain zero exactly once",
        )
        .with_context("set", name)
        .with_context("zeros", zeros.to_string()));
    }
    Ok(())
}

fn validate(placement: &PlacementParams) -> Result<(), HemiError> {
    if !(placement.radius.is_finite() && placement.radius > 0.0) {
        return Err(
            config_error("config-placement", "shell radius must be positive and finite")
                .with_context("radius", placement.radius.to_string()),
        );
    }
    if placement.n_elevation == 0 || placement.n_azimuth == 0 {
        return Err(
            config_error("config-placement", "elevation and azimuth steps must be >= 1")
                .with_context("n_elevation", placement.n_elevation.to_string())
                .with_context("n_azimuth", placement.n_azimuth.to_string()),
        );
    }
    let offsets = &placement.sensor_offsets;
    check_offsets("radial", &offsets.radial)?;
    check_offsets("azimuth", &offsets.expanded_azimuth())?;
    check_offsets("elevation", &offsets.elevation)?;
    Ok(())
}

/// Places `descriptors` and sensors over the hemisphere described by `placement`.
///
/// Sensors enumerate elevation × azimuth × radial offset × azimuth offset ×
/// elevation offset. Sources are emitted only for the zero-offset sensor of
/// each angular cell: an optional ferro centre first, then every descriptor,
/// each rotated so its pole points along the outward radial direction and
/// moved to the cell position.
pub fn generate_layout(
    descriptors: &[SourceSpec],
    placement: &PlacementParams,
) -> Result<HemisphereLayout, HemiError> {
    validate(placement)?;
    let offsets = &placement.sensor_offsets;
    let azimuth_offsets = offsets.expanded_azimuth();
    let ferro = placement.include_core.then(|| {
        let [diameter, height] = placement.core_dimension;
        SourceSpec::cylinder(Vector3::from(placement.core_polarization), diameter, height)
    });
    let loop_offset = descriptors
        .iter()
        .position(|source| matches!(source.kind, SourceKind::CurrentLoop { .. }));

    let cell_sensors = offsets.radial.len() * azimuth_offsets.len() * offsets.elevation.len();
    let mut sensors =
        Vec::with_capacity(placement.n_elevation * placement.n_azimuth * cell_sensors);
    let mut sources = Vec::new();

    for elevation in elevation_values(placement.n_elevation) {
        for azimuth in azimuth_values(placement.n_azimuth) {
            for &radial in &offsets.radial {
                for &azimuth_offset in &azimuth_offsets {
                    for &elevation_offset in &offsets.elevation {
                        let sensor_offsets = SensorOffsets {
                            radial,
                            azimuth: azimuth_offset,
                            elevation: elevation_offset,
                        };
                        let position = spherical_to_cartesian(
                            placement.radius + radial,
                            elevation + elevation_offset,
                            azimuth + azimuth_offset,
                        );
                        let mut source_index = None;
                        if sensor_offsets.is_zero() {
                            let rotation = align_pole_to(&position);
                            let cell_start = sources.len();
                            let ferro_count = usize::from(ferro.is_some());
                            source_index = loop_offset.map(|idx| cell_start + ferro_count + idx);
                            for source in ferro.iter().chain(descriptors) {
                                sources.push(source.clone().rotated(&rotation).moved(&position));
                            }
                        }
                        sensors.push(SensorSpec {
                            position,
                            offsets: sensor_offsets,
                            source_index,
                        });
                    }
                }
            }
        }
    }

    debug!(
        sources = sources.len(),
        sensors = sensors.len(),
        radius = placement.radius,
        "generated hemisphere layout"
    );
    Ok(HemisphereLayout { sources, sensors })
}

/// Builds the sources of `config` and places them with its placement parameters.
pub fn build_layout(config: &DesignConfig) -> Result<HemisphereLayout, HemiError> {
    let descriptors = build_sources(config)?;
    generate_layout(&descriptors, &config.placement)
}
