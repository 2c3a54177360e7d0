use hemi_core::errors::HemiError;
use hemi_core::{FieldOracle, SensorSpec, SourceSpec};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{query_scaled, FieldUnits};

/// Scaled field at one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointField {
    /// Sensor position in m.
    pub position: Vector3<f64>,
    /// Scaled field vector.
    pub field: Vector3<f64>,
    /// Euclidean norm of `field`.
    pub magnitude: f64,
}

/// Evaluates the field at every sensor with a single batched oracle query.
pub fn evaluate_points(
    oracle: &dyn FieldOracle,
    sources: &[SourceSpec],
    sensors: &[SensorSpec],
    units: &FieldUnits,
) -> Result<Vec<PointField>, HemiError> {
    let positions: Vec<Vector3<f64>> = sensors.iter().map(|sensor| sensor.position).collect();
    debug!(sensors = positions.len(), sources = sources.len(), "evaluating sensors");
    let field = query_scaled(oracle, sources, &positions, units)?;
    Ok(positions
        .into_iter()
        .zip(field)
        .map(|(position, field)| PointField {
            position,
            field,
            magnitude: field.norm(),
        })
        .collect())
}
