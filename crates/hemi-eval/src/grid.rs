//! Planar slice evaluation.
//!
//! A slice is a square `resolution × resolution` mesh spanning
//! `[-L, L]²` in one of two planes. The whole mesh is sent to the oracle as
//! one batch, the returned vectors are scaled by [`FieldUnits::field_scale`],
//! and the energy density `0.5 |B|²` and its in-plane gradient are derived.

use hemi_core::errors::{ErrorInfo, HemiError, FIELD_EVALUATION, FIELD_NON_FINITE, FIELD_SHAPE};
use hemi_core::{FieldOracle, SourceSpec};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gradient::gradient_2d;

/// Evaluation plane of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanePair {
    /// Top-down view: the x-y plane at z = 0.
    Top,
    /// Side view: the x-z plane at y = 0.
    Side,
}

impl PlanePair {
    /// Both views in evaluation order.
    pub const BOTH: [PlanePair; 2] = [PlanePair::Top, PlanePair::Side];

    /// Short label used in artefact names.
    pub fn label(&self) -> &'static str {
        match self {
            PlanePair::Top => "top",
            PlanePair::Side => "side",
        }
    }

    /// Names of the in-plane axes `(axis1, axis2)`.
    pub fn axis_names(&self) -> (&'static str, &'static str) {
        match self {
            PlanePair::Top => ("x", "y"),
            PlanePair::Side => ("x", "z"),
        }
    }

    /// 3D point for the in-plane coordinates.
    pub fn point(&self, axis1: f64, axis2: f64) -> Vector3<f64> {
        match self {
            PlanePair::Top => Vector3::new(axis1, axis2, 0.0),
            PlanePair::Side => Vector3::new(axis1, 0.0, axis2),
        }
    }
}

/// Unit convention applied to oracle output before energy is computed.
///
/// The default scale of `1e-3` reproduces the historical sweep scores. It is
/// applied to slice and sensor evaluation only; pull-force estimation uses
/// oracle output unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldUnits {
    /// Factor multiplied into every field component.
    #[serde(default = "FieldUnits::default_field_scale")]
    pub field_scale: f64,
}

impl FieldUnits {
    const fn default_field_scale() -> f64 {
        1e-3
    }

    /// Oracle output used as is (Tesla).
    pub const fn tesla() -> Self {
        Self { field_scale: 1.0 }
    }
}

impl Default for FieldUnits {
    fn default() -> Self {
        Self {
            field_scale: Self::default_field_scale(),
        }
    }
}

/// Slice evaluation settings shared by every configuration of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Samples per slice axis.
    #[serde(default = "EvaluationSettings::default_resolution")]
    pub resolution: usize,
    /// Slice half-width relative to the shell radius.
    #[serde(default = "EvaluationSettings::default_grid_scale")]
    pub grid_scale: f64,
    /// Unit convention for oracle output.
    #[serde(default)]
    pub units: FieldUnits,
}

impl EvaluationSettings {
    const fn default_resolution() -> usize {
        60
    }

    const fn default_grid_scale() -> f64 {
        1.25
    }

    /// Slice half-width for a shell of `radius`.
    pub fn grid_length(&self, radius: f64) -> f64 {
        radius * self.grid_scale
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            resolution: Self::default_resolution(),
            grid_scale: Self::default_grid_scale(),
            units: FieldUnits::default(),
        }
    }
}

/// Field, energy and energy gradient over one slice.
///
/// Cell values are stored row-major: index `i2 * axis1.len() + i1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGrid {
    plane: PlanePair,
    axis1: Vec<f64>,
    axis2: Vec<f64>,
    field: Vec<Vector3<f64>>,
    energy: Vec<f64>,
    grad_axis1: Vec<f64>,
    grad_axis2: Vec<f64>,
}

impl FieldGrid {
    /// Derives energy and gradient from scaled field vectors on a mesh.
    pub fn from_field(
        plane: PlanePair,
        axis1: Vec<f64>,
        axis2: Vec<f64>,
        field: Vec<Vector3<f64>>,
    ) -> Result<Self, HemiError> {
        let energy: Vec<f64> = field.iter().map(|b| 0.5 * b.norm_squared()).collect();
        let (grad_axis1, grad_axis2) = gradient_2d(&energy, &axis1, &axis2)?;
        Ok(Self {
            plane,
            axis1,
            axis2,
            field,
            energy,
            grad_axis1,
            grad_axis2,
        })
    }

    /// Evaluation plane.
    pub fn plane(&self) -> PlanePair {
        self.plane
    }

    /// Coordinates along the first in-plane axis.
    pub fn axis1(&self) -> &[f64] {
        &self.axis1
    }

    /// Coordinates along the second in-plane axis.
    pub fn axis2(&self) -> &[f64] {
        &self.axis2
    }

    /// Scaled field vectors.
    pub fn field(&self) -> &[Vector3<f64>] {
        &self.field
    }

    /// Energy density per cell.
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// Energy derivative along the first axis.
    pub fn grad_axis1(&self) -> &[f64] {
        &self.grad_axis1
    }

    /// Energy derivative along the second axis.
    pub fn grad_axis2(&self) -> &[f64] {
        &self.grad_axis2
    }

    /// Force proxy `sqrt(g1² + g2²)` per cell.
    pub fn force_magnitude(&self) -> Vec<f64> {
        self.grad_axis1
            .iter()
            .zip(&self.grad_axis2)
            .map(|(g1, g2)| g1.hypot(*g2))
            .collect()
    }

    /// Iterates `(axis1, axis2, energy, grad_axis1, grad_axis2)` per cell.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64, f64, f64)> + '_ {
        let n1 = self.axis1.len();
        self.energy.iter().enumerate().map(move |(idx, energy)| {
            (
                self.axis1[idx % n1],
                self.axis2[idx / n1],
                *energy,
                self.grad_axis1[idx],
                self.grad_axis2[idx],
            )
        })
    }
}

/// Top and side slices of one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViews {
    /// x-y slice at z = 0.
    pub top: FieldGrid,
    /// x-z slice at y = 0.
    pub side: FieldGrid,
}

/// `n` values evenly spaced over `[lo, hi]`, both ends included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        n => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|idx| lo + step * idx as f64).collect();
            values[n - 1] = hi;
            values
        }
    }
}

/// Queries `oracle` once for `points` and applies the unit scale.
pub(crate) fn query_scaled(
    oracle: &dyn FieldOracle,
    sources: &[SourceSpec],
    points: &[Vector3<f64>],
    units: &FieldUnits,
) -> Result<Vec<Vector3<f64>>, HemiError> {
    let raw = oracle.query(sources, points).map_err(|err| match err {
        HemiError::Field(info) => HemiError::Field(info.with_context("oracle", oracle.name())),
        other => HemiError::Field(
            ErrorInfo::new(FIELD_EVALUATION, "field oracle query failed")
                .with_context("oracle", oracle.name())
                .with_context("cause", other.to_string()),
        ),
    })?;
    if raw.len() != points.len() {
        return Err(HemiError::Field(
            ErrorInfo::new(FIELD_SHAPE, "oracle returned a different number of vectors")
                .with_context("expected", points.len().to_string())
                .with_context("actual", raw.len().to_string()),
        ));
    }
    let scaled: Vec<Vector3<f64>> = raw.into_iter().map(|b| b * units.field_scale).collect();
    if let Some(idx) = scaled
        .iter()
        .position(|b| b.iter().any(|component| !component.is_finite()))
    {
        return Err(HemiError::Field(
            ErrorInfo::new(FIELD_NON_FINITE, "field contains NaN or infinite components")
                .with_context("point_index", idx.to_string()),
        ));
    }
    Ok(scaled)
}

/// Evaluates one slice of half-width `grid_length` at `resolution` samples per axis.
pub fn evaluate_grid(
    oracle: &dyn FieldOracle,
    sources: &[SourceSpec],
    plane: PlanePair,
    grid_length: f64,
    resolution: usize,
    units: &FieldUnits,
) -> Result<FieldGrid, HemiError> {
    if resolution < 2 {
        return Err(HemiError::Config(
            ErrorInfo::new("config-resolution", "slice resolution must be at least 2")
                .with_context("resolution", resolution.to_string()),
        ));
    }
    if !(grid_length.is_finite() && grid_length > 0.0) {
        return Err(HemiError::Config(
            ErrorInfo::new("config-grid-length", "slice half-width must be positive")
                .with_context("grid_length", grid_length.to_string()),
        ));
    }
    let axis1 = linspace(-grid_length, grid_length, resolution);
    let axis2 = axis1.clone();
    let points: Vec<Vector3<f64>> = axis2
        .iter()
        .flat_map(|&a2| axis1.iter().map(move |&a1| plane.point(a1, a2)))
        .collect();
    debug!(
        plane = plane.label(),
        points = points.len(),
        sources = sources.len(),
        "evaluating slice"
    );
    let field = query_scaled(oracle, sources, &points, units)
        .map_err(|err| err.with_context("plane", plane.label()))?;
    FieldGrid::from_field(plane, axis1, axis2, field)
}

/// Evaluates the top and side slices for a shell of `radius`.
pub fn evaluate_views(
    oracle: &dyn FieldOracle,
    sources: &[SourceSpec],
    radius: f64,
    settings: &EvaluationSettings,
) -> Result<FieldViews, HemiError> {
    let grid_length = settings.grid_length(radius);
    let top = evaluate_grid(
        oracle,
        sources,
        PlanePair::Top,
        grid_length,
        settings.resolution,
        &settings.units,
    )?;
    let side = evaluate_grid(
        oracle,
        sources,
        PlanePair::Side,
        grid_length,
        settings.resolution,
        &settings.units,
    )?;
    Ok(FieldViews { top, side })
}
