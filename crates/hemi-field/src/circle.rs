//! Field of an idealised circular current loop.

use std::f64::consts::PI;

use hemi_core::errors::{ErrorInfo, HemiError, FIELD_DEGENERATE_SOURCE};
use hemi_core::MU_0;
use nalgebra::Vector3;

use crate::special::{ellipe, ellipk};

/// Relative distance to the wire below which a point counts as on the loop.
const WIRE_TOLERANCE: f64 = 1e-10;
/// Relative radial distance below which the point is treated as on-axis.
const AXIS_TOLERANCE: f64 = 1e-8;

/// Flux density (T) of a loop of `diameter` carrying `current`, centred at the
/// origin in the x-y plane, evaluated at `point` in the same local frame.
///
/// Uses the closed form in complete elliptic integrals:
///
///   Bz = C / (2 α² β) · ((a² − ρ² − z²) E(k²) + α² K(k²))
///   Bρ = C z / (2 α² β ρ) · ((a² + ρ² + z²) E(k²) − α² K(k²))
///
/// with `α² = a² + ρ² + z² − 2aρ`, `β² = a² + ρ² + z² + 2aρ`,
/// `k² = 1 − α²/β²` and `C = μ0 I / π`.
pub fn loop_field(
    current: f64,
    diameter: f64,
    point: &Vector3<f64>,
) -> Result<Vector3<f64>, HemiError> {
    let a = 0.5 * diameter;
    if !(a.is_finite() && a > 0.0) || !current.is_finite() {
        return Err(HemiError::Field(
            ErrorInfo::new(
                FIELD_DEGENERATE_SOURCE,
                "current loop needs a positive finite diameter",
            )
            .with_context("diameter", diameter.to_string())
            .with_context("current", current.to_string()),
        ));
    }
    if current == 0.0 {
        return Ok(Vector3::zeros());
    }

    let rho = point.x.hypot(point.y);
    let z = point.z;
    let sum_sq = a * a + rho * rho + z * z;
    let alpha_sq = sum_sq - 2.0 * a * rho;
    let beta_sq = sum_sq + 2.0 * a * rho;
    if alpha_sq <= (WIRE_TOLERANCE * a).powi(2) {
        return Err(HemiError::Field(
            ErrorInfo::new(FIELD_DEGENERATE_SOURCE, "query point lies on the loop wire")
                .with_context("rho", rho.to_string())
                .with_context("z", z.to_string()),
        ));
    }
    let beta = beta_sq.sqrt();
    let m = 1.0 - alpha_sq / beta_sq;
    let k_val = ellipk(m);
    let e_val = ellipe(m);
    let prefactor = MU_0 * current / PI;
    let denom = 2.0 * alpha_sq * beta;

    let bz = prefactor / denom * ((a * a - rho * rho - z * z) * e_val + alpha_sq * k_val);
    if rho < AXIS_TOLERANCE * a {
        return Ok(Vector3::new(0.0, 0.0, bz));
    }
    let brho = prefactor * z / (denom * rho) * (sum_sq * e_val - alpha_sq * k_val);
    Ok(Vector3::new(brho * point.x / rho, brho * point.y / rho, bz))
}

/// On-axis field magnitude of a loop, `μ0 I a² / (2 (a² + z²)^{3/2})`.
pub fn loop_axial_field(current: f64, diameter: f64, z: f64) -> f64 {
    let a = 0.5 * diameter;
    MU_0 * current * a * a / (2.0 * (a * a + z * z).powf(1.5))
}
