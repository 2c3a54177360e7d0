use serde::{Deserialize, Serialize};

use crate::grid::{FieldGrid, FieldViews};

/// Stabiliser added to the minimum energy in the contrast denominator.
pub const ENERGY_EPSILON: f64 = 1e-10;

/// Metrics of a single slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewMetrics {
    /// Mean of the force proxy over the slice.
    pub avg_force: f64,
    /// Maximum energy density.
    pub energy_peak: f64,
    /// `max / (min + ENERGY_EPSILON)` of the energy density.
    pub energy_contrast: f64,
}

impl ViewMetrics {
    /// Reduces a slice.
    pub fn from_grid(grid: &FieldGrid) -> Self {
        let force = grid.force_magnitude();
        let avg_force = force.iter().sum::<f64>() / force.len() as f64;
        let energy = grid.energy();
        let max = energy.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = energy.iter().copied().fold(f64::INFINITY, f64::min);
        Self {
            avg_force,
            energy_peak: max,
            energy_contrast: max / (min + ENERGY_EPSILON),
        }
    }
}

/// Performance metrics of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Mean force proxy over the top slice.
    pub avg_force_top: f64,
    /// Mean force proxy over the side slice.
    pub avg_force_side: f64,
    /// Peak energy on the top slice.
    pub energy_peak_top: f64,
    /// Peak energy on the side slice.
    pub energy_peak_side: f64,
    /// Energy contrast on the top slice.
    pub energy_contrast_top: f64,
    /// Energy contrast on the side slice.
    pub energy_contrast_side: f64,
    /// Mean of the two average forces.
    pub force_strength: f64,
    /// Mean of the two energy peaks.
    pub energy_peak: f64,
    /// Mean of the two energy contrasts.
    pub energy_contrast: f64,
    /// Composite ranking score.
    pub score: f64,
}

/// Equal-weight trade-off between force strength and energy contrast.
pub fn composite_score(force_strength: f64, energy_contrast: f64) -> f64 {
    0.5 * force_strength + 0.5 * energy_contrast
}

/// Reduces a top/side slice pair into a [`MetricsRecord`].
pub fn calculate_metrics(views: &FieldViews) -> MetricsRecord {
    let top = ViewMetrics::from_grid(&views.top);
    let side = ViewMetrics::from_grid(&views.side);
    let force_strength = (top.avg_force + side.avg_force) / 2.0;
    let energy_peak = (top.energy_peak + side.energy_peak) / 2.0;
    let energy_contrast = (top.energy_contrast + side.energy_contrast) / 2.0;
    MetricsRecord {
        avg_force_top: top.avg_force,
        avg_force_side: side.avg_force,
        energy_peak_top: top.energy_peak,
        energy_peak_side: side.energy_peak,
        energy_contrast_top: top.energy_contrast,
        energy_contrast_side: side.energy_contrast,
        force_strength,
        energy_peak,
        energy_contrast,
        score: composite_score(force_strength, energy_contrast),
    }
}
