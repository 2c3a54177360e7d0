use hemi_core::errors::{ErrorInfo, HemiError, FIELD_NON_FINITE};
use hemi_core::{FieldOracle, SourceKind, SourceSpec};
use nalgebra::{Rotation3, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::circle::loop_field;
use crate::cylinder::cylinder_field;

/// Reference oracle superposing the closed-form loop and cylinder fields.
///
/// Every source is evaluated in its own frame: the query point is mapped
/// through the inverse placement, the local field is computed and rotated
/// back. Points are evaluated in parallel; results keep query order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticOracle;

impl AnalyticOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

struct PlacedSource<'a> {
    spec: &'a SourceSpec,
    rotation: Rotation3<f64>,
    inverse: Rotation3<f64>,
}

impl PlacedSource<'_> {
    fn field_at(&self, point: &Vector3<f64>) -> Result<Vector3<f64>, HemiError> {
        let local = self.inverse * (point - self.spec.position);
        let local_field = match &self.spec.kind {
            SourceKind::CurrentLoop { current, diameter } => {
                loop_field(*current, *diameter, &local)?
            }
            SourceKind::Cylinder {
                polarization,
                diameter,
                height,
            } => cylinder_field(polarization, *diameter, *height, &local)?,
        };
        Ok(self.rotation * local_field)
    }
}

impl FieldOracle for AnalyticOracle {
    fn name(&self) -> &str {
        "analytic"
    }

    fn query(
        &self,
        sources: &[SourceSpec],
        points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError> {
        debug!(sources = sources.len(), points = points.len(), "analytic field query");
        let placed: Vec<PlacedSource<'_>> = sources
            .iter()
            .map(|spec| {
                let rotation = spec.orientation.rotation();
                PlacedSource {
                    spec,
                    rotation,
                    inverse: rotation.inverse(),
                }
            })
            .collect();

        points
            .par_iter()
            .enumerate()
            .map(|(idx, point)| {
                let mut total = Vector3::zeros();
                for (source_idx, source) in placed.iter().enumerate() {
                    total += source.field_at(point).map_err(|err| {
                        err.with_context("point_index", idx.to_string())
                            .with_context("source_index", source_idx.to_string())
                    })?;
                }
                if total.iter().all(|component| component.is_finite()) {
                    Ok(total)
                } else {
                    Err(HemiError::Field(
                        ErrorInfo::new(FIELD_NON_FINITE, "superposed field is not finite")
                            .with_context("point_index", idx.to_string()),
                    ))
                }
            })
            .collect()
    }
}
