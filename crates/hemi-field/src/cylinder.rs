//! Field of a uniformly magnetised solid cylinder.
//!
//! The axial polarization component uses the Derby–Olbert closed form in
//! Bulirsch's `cel`. The transverse component is the field of the equivalent
//! surface charge `J⊥·n` on the mantle: the height integral is done in
//! closed form and the azimuthal one by the periodic midpoint rule.
//!
//! The midpoint rule converges like `exp(-n·d/R)` for a point at distance `d`
//! from the mantle, so the node count grows as the point approaches it,
//! from [`MANTLE_NODES`] up to [`MAX_MANTLE_NODES`]. Points closer than about
//! `40·R / MAX_MANTLE_NODES` lose accuracy.

use std::f64::consts::PI;

use hemi_core::errors::{ErrorInfo, HemiError, FIELD_DEGENERATE_SOURCE};
use nalgebra::Vector3;

use crate::special::cel;

/// Minimum azimuthal nodes used for the transverse surface-charge integral.
pub const MANTLE_NODES: usize = 128;
/// Upper bound on the azimuthal node count near the mantle.
pub const MAX_MANTLE_NODES: usize = 1 << 16;
/// Nodes per unit of `R / d` for the transverse integral.
const NODES_PER_INVERSE_GAP: f64 = 40.0;
/// Relative distance to an edge below which the field is singular.
const EDGE_TOLERANCE: f64 = 1e-9;

fn degenerate(message: &str, point: &Vector3<f64>) -> HemiError {
    HemiError::Field(
        ErrorInfo::new(FIELD_DEGENERATE_SOURCE, message)
            .with_context("x", point.x.to_string())
            .with_context("y", point.y.to_string())
            .with_context("z", point.z.to_string()),
    )
}

/// Flux density (T) of a cylinder centred at the origin with its axis along
/// local +Z, evaluated at `point` in the same local frame.
pub fn cylinder_field(
    polarization: &Vector3<f64>,
    diameter: f64,
    height: f64,
    point: &Vector3<f64>,
) -> Result<Vector3<f64>, HemiError> {
    let radius = 0.5 * diameter;
    let half = 0.5 * height;
    if !(radius.is_finite() && radius > 0.0 && half.is_finite() && half > 0.0) {
        return Err(HemiError::Field(
            ErrorInfo::new(
                FIELD_DEGENERATE_SOURCE,
                "cylinder needs positive finite dimensions",
            )
            .with_context("diameter", diameter.to_string())
            .with_context("height", height.to_string()),
        ));
    }
    let mut field = Vector3::zeros();
    if polarization.z != 0.0 {
        field += axial_field(polarization.z, radius, half, point)?;
    }
    if polarization.x != 0.0 || polarization.y != 0.0 {
        field += transverse_field(polarization.x, polarization.y, radius, half, point)?;
    }
    Ok(field)
}

fn axial_field(
    jz: f64,
    radius: f64,
    half: f64,
    point: &Vector3<f64>,
) -> Result<Vector3<f64>, HemiError> {
    let rho = point.x.hypot(point.y);
    let z = point.z;
    let tol = EDGE_TOLERANCE * radius;
    let z_plus = z + half;
    let z_minus = z - half;
    if (rho - radius).abs() <= tol && (z_plus.abs() <= tol || z_minus.abs() <= tol) {
        return Err(degenerate("query point lies on a cylinder rim", point));
    }

    let outer = radius + rho;
    let inner = radius - rho;
    let dist_plus = (z_plus * z_plus + outer * outer).sqrt();
    let dist_minus = (z_minus * z_minus + outer * outer).sqrt();
    let alpha_plus = radius / dist_plus;
    let alpha_minus = radius / dist_minus;
    let beta_plus = z_plus / dist_plus;
    let beta_minus = z_minus / dist_minus;
    let gamma = inner / outer;
    let kc_plus = ((z_plus * z_plus + inner * inner) / (z_plus * z_plus + outer * outer)).sqrt();
    let kc_minus =
        ((z_minus * z_minus + inner * inner) / (z_minus * z_minus + outer * outer)).sqrt();

    let b0 = jz / PI;
    let brho = b0
        * (alpha_plus * cel(kc_plus, 1.0, 1.0, -1.0)
            - alpha_minus * cel(kc_minus, 1.0, 1.0, -1.0));
    let g2 = gamma * gamma;
    let bz = b0 * radius / outer
        * (beta_plus * cel(kc_plus, g2, 1.0, gamma)
            - beta_minus * cel(kc_minus, g2, 1.0, gamma));

    if rho == 0.0 {
        return Ok(Vector3::new(0.0, 0.0, bz));
    }
    Ok(Vector3::new(brho * point.x / rho, brho * point.y / rho, bz))
}

fn transverse_field(
    jx: f64,
    jy: f64,
    radius: f64,
    half: f64,
    point: &Vector3<f64>,
) -> Result<Vector3<f64>, HemiError> {
    let nodes = mantle_nodes(radius, half, point);
    let step = 2.0 * PI / nodes as f64;
    let u_low = point.z - half;
    let u_high = point.z + half;
    let min_h_sq = (EDGE_TOLERANCE * radius).powi(2);
    let mut field = Vector3::zeros();
    for node in 0..nodes {
        let phi = (node as f64 + 0.5) * step;
        let (sin, cos) = phi.sin_cos();
        let sigma = jx * cos + jy * sin;
        let dx = point.x - radius * cos;
        let dy = point.y - radius * sin;
        let h_sq = dx * dx + dy * dy;
        if h_sq <= min_h_sq {
            return Err(degenerate("query point lies on a cylinder mantle node", point));
        }
        let r_low = (h_sq + u_low * u_low).sqrt();
        let r_high = (h_sq + u_high * u_high).sqrt();
        let horizontal = (u_high / r_high - u_low / r_low) / h_sq;
        let vertical = 1.0 / r_low - 1.0 / r_high;
        let weight = sigma * radius * step / (4.0 * PI);
        field += Vector3::new(dx * horizontal, dy * horizontal, vertical) * weight;
    }
    let rho = point.x.hypot(point.y);
    if rho < radius && point.z.abs() < half {
        field += Vector3::new(jx, jy, 0.0);
    }
    Ok(field)
}

fn mantle_nodes(radius: f64, half: f64, point: &Vector3<f64>) -> usize {
    let rho = point.x.hypot(point.y);
    let beyond = (point.z.abs() - half).max(0.0);
    let gap = (rho - radius).abs().hypot(beyond);
    if gap <= 0.0 {
        return MAX_MANTLE_NODES;
    }
    let wanted = (NODES_PER_INVERSE_GAP * radius / gap).ceil();
    if wanted >= MAX_MANTLE_NODES as f64 {
        MAX_MANTLE_NODES
    } else {
        (wanted as usize).max(MANTLE_NODES)
    }
}
