use hemi_core::errors::{ErrorInfo, HemiError};
use hemi_core::MU_0;
use serde::{Deserialize, Serialize};

/// Flat spiral coil approximated as concentric turns sharing one plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralCoil {
    /// Radius of the innermost turn in m.
    pub inner_radius: f64,
    /// Radius of the outermost turn in m.
    pub outer_radius: f64,
    /// Number of turns, spread evenly between the two radii.
    pub turns: usize,
    /// Current through every turn in A.
    pub current: f64,
}

impl SpiralCoil {
    /// Validates the geometry and returns the turn radii.
    pub fn radii(&self) -> Result<Vec<f64>, HemiError> {
        if self.turns == 0
            || !(self.inner_radius > 0.0 && self.outer_radius >= self.inner_radius)
            || !self.outer_radius.is_finite()
        {
            return Err(HemiError::Config(
                ErrorInfo::new("config-spiral", "spiral coil needs 0 < inner <= outer radii")
                    .with_context("inner_radius", self.inner_radius.to_string())
                    .with_context("outer_radius", self.outer_radius.to_string())
                    .with_context("turns", self.turns.to_string()),
            ));
        }
        Ok(turn_radii(self.inner_radius, self.outer_radius, self.turns))
    }

    /// On-axis field (T) at distance `z` from the coil plane.
    pub fn axial_field(&self, z: f64) -> Result<f64, HemiError> {
        Ok(spiral_axial_field(&self.radii()?, self.current, z, MU_0))
    }

    /// On-axis field at each of `zs`.
    pub fn axial_profile(&self, zs: &[f64]) -> Result<Vec<f64>, HemiError> {
        let radii = self.radii()?;
        Ok(zs
            .iter()
            .map(|&z| spiral_axial_field(&radii, self.current, z, MU_0))
            .collect())
    }
}

/// `turns` radii evenly spaced over `[inner, outer]`, both ends included.
pub fn turn_radii(inner: f64, outer: f64, turns: usize) -> Vec<f64> {
    match turns {
        0 => Vec::new(),
        1 => vec![inner],
        n => {
            let step = (outer - inner) / (n - 1) as f64;
            (0..n).map(|idx| inner + step * idx as f64).collect()
        }
    }
}

/// Sum of the on-axis loop fields `μ I r² / (2 (r² + z²)^{3/2})` over `radii`.
pub fn spiral_axial_field(radii: &[f64], current: f64, z: f64, permeability: f64) -> f64 {
    radii
        .iter()
        .map(|r| permeability * current * r * r / (2.0 * (r * r + z * z).powf(1.5)))
        .sum()
}
