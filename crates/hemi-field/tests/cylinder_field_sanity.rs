use std::f64::consts::PI;

use hemi_core::errors::FIELD_DEGENERATE_SOURCE;
use hemi_core::MU_0;
use hemi_field::{cylinder_field, loop_field};
use nalgebra::Vector3;

fn axial_on_axis(j: f64, radius: f64, half: f64, z: f64) -> f64 {
    let upper = z + half;
    let lower = z - half;
    0.5 * j
        * (upper / (upper * upper + radius * radius).sqrt()
            - lower / (lower * lower + radius * radius).sqrt())
}

/// Dipole field written in terms of the polarization-volume product `J V`.
fn dipole_field(jv: Vector3<f64>, r: Vector3<f64>) -> Vector3<f64> {
    let dist = r.norm();
    let unit = r / dist;
    (3.0 * jv.dot(&unit) * unit - jv) / (4.0 * PI * dist.powi(3))
}

#[test]
fn axial_on_axis_matches_solenoid_formula() {
    let j = Vector3::new(0.0, 0.0, 1.2);
    for &z in &[0.0, 0.003, 0.02, -0.05] {
        let field = cylinder_field(&j, 0.01, 0.01, &Vector3::new(0.0, 0.0, z)).expect("field");
        let expected = axial_on_axis(1.2, 0.005, 0.005, z);
        assert!((field.z - expected).abs() < 1e-9, "z={z}: {} vs {expected}", field.z);
        assert_eq!(field.x, 0.0);
    }
}

#[test]
fn long_axial_cylinder_centre_approaches_polarization() {
    let field = cylinder_field(&Vector3::new(0.0, 0.0, 1.0), 0.01, 10.0, &Vector3::zeros())
        .expect("field");
    assert!((field.z - 1.0).abs() < 1e-4);
}

#[test]
fn long_transverse_cylinder_centre_is_half_polarization() {
    let field = cylinder_field(&Vector3::new(1.0, 0.0, 0.0), 0.01, 10.0, &Vector3::zeros())
        .expect("field");
    assert!((field.x - 0.5).abs() < 1e-4, "{field:?}");
    assert!(field.y.abs() < 1e-9);
    assert!(field.z.abs() < 1e-9);
}

#[test]
fn far_field_approaches_dipole() {
    let diameter = 0.01;
    let height = 0.01;
    let volume = PI * 0.25 * diameter * diameter * height;
    for polarization in [Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.3, -0.4, 0.0)] {
        for point in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.3, 0.5, -0.6),
        ] {
            let field = cylinder_field(&polarization, diameter, height, &point).expect("field");
            let expected = dipole_field(polarization * volume, point);
            assert!(
                (field - expected).norm() <= 1e-3 * expected.norm(),
                "{polarization:?} at {point:?}: {field:?} vs {expected:?}"
            );
        }
    }
}

/// Axially magnetised cylinder as a stack of thin loops carrying `J/μ0 · dz`.
fn stacked_loops(jz: f64, diameter: f64, height: f64, point: Vector3<f64>) -> Vector3<f64> {
    let slices = 4000;
    let dz = height / slices as f64;
    let mut field = Vector3::zeros();
    for slice in 0..slices {
        let centre = -0.5 * height + (slice as f64 + 0.5) * dz;
        let local = Vector3::new(point.x, point.y, point.z - centre);
        field += loop_field(jz / MU_0 * dz, diameter, &local).expect("loop");
    }
    field
}

#[test]
fn axial_off_axis_matches_stacked_loops() {
    let polarization = Vector3::new(0.0, 0.0, 1.0);
    for point in [
        Vector3::new(0.015, 0.003, 0.004),
        Vector3::new(0.004, 0.0, 0.0),
        Vector3::new(0.0, 0.02, -0.01),
        Vector3::new(0.008, -0.006, 0.012),
    ] {
        let field = cylinder_field(&polarization, 0.02, 0.01, &point).expect("field");
        let expected = stacked_loops(1.0, 0.02, 0.01, point);
        assert!(
            (field - expected).norm() <= 1e-6 * expected.norm(),
            "{point:?}: {field:?} vs {expected:?}"
        );
    }
}

#[test]
fn transverse_field_close_to_mantle() {
    let radius = 0.005;
    let polarization = Vector3::new(0.6, -0.8, 0.0);
    // Long enough that the mid-plane sees the two-dimensional solution.
    let height = 5000.0 * radius;
    for (r, angle) in [(1.01 * radius, 0.3_f64), (0.99 * radius, 1.1), (1.05 * radius, 2.0)] {
        let point = Vector3::new(r * angle.cos(), r * angle.sin(), 0.0);
        let expected = if r < radius {
            polarization * 0.5
        } else {
            let unit = point / r;
            let scale = radius * radius / (2.0 * r * r);
            (2.0 * polarization.dot(&unit) * unit - polarization) * scale
        };
        let field = cylinder_field(&polarization, 2.0 * radius, height, &point).expect("field");
        assert!(
            (field - expected).norm() <= 1e-5 * expected.norm(),
            "r={r}: {field:?} vs {expected:?}"
        );
    }
}

#[test]
fn rim_point_is_degenerate() {
    let err = cylinder_field(
        &Vector3::new(0.0, 0.0, 1.0),
        0.01,
        0.02,
        &Vector3::new(0.005, 0.0, 0.01),
    )
    .expect_err("rim");
    assert_eq!(err.code(), FIELD_DEGENERATE_SOURCE);
}

#[test]
fn zero_height_is_degenerate() {
    let err = cylinder_field(&Vector3::new(0.0, 0.0, 1.0), 0.01, 0.0, &Vector3::zeros())
        .expect_err("flat cylinder");
    assert_eq!(err.code(), FIELD_DEGENERATE_SOURCE);
}
