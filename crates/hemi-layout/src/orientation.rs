use hemi_core::{pole, Orientation};
use nalgebra::Vector3;
use tracing::debug;

/// Cross-product norm below which a direction counts as already aligned with the pole.
pub const ALIGNMENT_TOLERANCE: f64 = 1e-9;

/// Rotation taking the canonical +Z pole onto the unit vector along `direction`.
///
/// The axis is `pole × r̂` normalised and the angle `acos(pole · r̂)`. When the
/// cross-product norm does not exceed [`ALIGNMENT_TOLERANCE`] the identity is
/// returned and a degenerate-geometry event is traced.
pub fn align_pole_to(direction: &Vector3<f64>) -> Orientation {
    let norm = direction.norm();
    if !(norm.is_finite() && norm > 0.0) {
        debug!(
            x = direction.x,
            y = direction.y,
            z = direction.z,
            "degenerate geometry: zero-length direction, leaving source unrotated"
        );
        return Orientation::identity();
    }
    let radial = direction / norm;
    let cross = pole().cross(&radial);
    let cross_norm = cross.norm();
    if cross_norm <= ALIGNMENT_TOLERANCE {
        debug!(
            cross_norm,
            "degenerate geometry: direction parallel to pole, leaving source unrotated"
        );
        return Orientation::identity();
    }
    let angle = pole().dot(&radial).clamp(-1.0, 1.0).acos();
    Orientation::from_axis_angle(cross / cross_norm, angle)
}
