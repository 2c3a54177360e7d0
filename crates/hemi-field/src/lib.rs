#![deny(missing_docs)]
#![doc = "Closed-form magnetic field oracle for current loops and magnetised cylinders."]

/// Circular current loop field.
pub mod circle;
/// Uniformly magnetised cylinder field.
pub mod cylinder;
/// Superposition oracle implementing [`hemi_core::FieldOracle`].
pub mod oracle;
/// Complete elliptic integrals.
pub mod special;
/// On-axis estimate for flat spiral coils.
pub mod spiral;

pub use circle::{loop_axial_field, loop_field};
pub use cylinder::cylinder_field;
pub use oracle::AnalyticOracle;
pub use spiral::{spiral_axial_field, turn_radii, SpiralCoil};
