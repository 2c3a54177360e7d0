use nalgebra::{Rotation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Vacuum permeability in H/m.
pub const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// Canonical pole direction of every source before placement.
pub fn pole() -> Vector3<f64> {
    Vector3::z()
}

/// Rotation stored as a normalised axis and an angle in radians.
///
/// The canonical source points along +Z; a placed source's pole direction is
/// `rotation() * pole()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Unit rotation axis (ignored when `angle == 0`).
    pub axis: Vector3<f64>,
    /// Rotation angle in radians.
    pub angle: f64,
}

impl Orientation {
    /// The unrotated orientation.
    pub fn identity() -> Self {
        Self {
            axis: pole(),
            angle: 0.0,
        }
    }

    /// Builds an orientation from an arbitrary (non-normalised) axis.
    ///
    /// A zero-length axis or zero angle yields the identity.
    pub fn from_axis_angle(axis: Vector3<f64>, angle: f64) -> Self {
        let norm = axis.norm();
        if norm == 0.0 || angle == 0.0 {
            return Self::identity();
        }
        Self {
            axis: axis / norm,
            angle,
        }
    }

    /// Whether this orientation applies no rotation.
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0
    }

    /// Equivalent rotation matrix.
    pub fn rotation(&self) -> Rotation3<f64> {
        if self.is_identity() {
            Rotation3::identity()
        } else {
            Rotation3::from_axis_angle(&Unit::new_normalize(self.axis), self.angle)
        }
    }

    /// Orientation obtained by applying `self` after `inner`.
    pub fn compose(&self, inner: &Orientation) -> Orientation {
        if inner.is_identity() {
            return *self;
        }
        if self.is_identity() {
            return *inner;
        }
        let matrix = self.rotation() * inner.rotation();
        let combined = UnitQuaternion::from_rotation_matrix(&matrix);
        match combined.axis_angle() {
            Some((axis, angle)) => Orientation::from_axis_angle(axis.into_inner(), angle),
            None => Orientation::identity(),
        }
    }

    /// Direction of the source pole after rotation.
    pub fn pole_direction(&self) -> Vector3<f64> {
        self.rotation() * pole()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Physical description of a field source in its own frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    /// Idealised circular current loop in the local x-y plane.
    CurrentLoop {
        /// Effective current in A (per-turn current times turns).
        current: f64,
        /// Loop diameter in m.
        diameter: f64,
    },
    /// Uniformly magnetised cylinder with its axis along local +Z.
    Cylinder {
        /// Magnetic polarization `J = μ0 M` in T, local frame.
        polarization: Vector3<f64>,
        /// Cylinder diameter in m.
        diameter: f64,
        /// Cylinder height in m.
        height: f64,
    },
}

/// A placed field source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Physical description in the local frame.
    pub kind: SourceKind,
    /// Centre of the source in m.
    pub position: Vector3<f64>,
    /// Rotation mapping the local frame to the global frame.
    #[serde(default)]
    pub orientation: Orientation,
}

impl SourceSpec {
    /// Current loop at the origin with identity orientation.
    pub fn current_loop(current: f64, diameter: f64) -> Self {
        Self {
            kind: SourceKind::CurrentLoop { current, diameter },
            position: Vector3::zeros(),
            orientation: Orientation::identity(),
        }
    }

    /// Magnetised cylinder at the origin with identity orientation.
    pub fn cylinder(polarization: Vector3<f64>, diameter: f64, height: f64) -> Self {
        Self {
            kind: SourceKind::Cylinder {
                polarization,
                diameter,
                height,
            },
            position: Vector3::zeros(),
            orientation: Orientation::identity(),
        }
    }

    /// Rotates the source about its own centre.
    pub fn rotated(mut self, rotation: &Orientation) -> Self {
        self.orientation = rotation.compose(&self.orientation);
        self
    }

    /// Translates the source by `delta`.
    pub fn moved(mut self, delta: &Vector3<f64>) -> Self {
        self.position += delta;
        self
    }

    /// Short label of the source kind.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            SourceKind::CurrentLoop { .. } => "current_loop",
            SourceKind::Cylinder { .. } => "cylinder",
        }
    }
}

/// Offsets applied to the canonical placement when generating a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SensorOffsets {
    /// Radial offset in m.
    pub radial: f64,
    /// Azimuth offset in radians.
    pub azimuth: f64,
    /// Elevation offset in radians.
    pub elevation: f64,
}

impl SensorOffsets {
    /// Whether this is the canonical placement (all offsets zero).
    pub fn is_zero(&self) -> bool {
        self.radial == 0.0 && self.azimuth == 0.0 && self.elevation == 0.0
    }
}

/// A field probe location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    /// Probe position in m.
    pub position: Vector3<f64>,
    /// Offsets that produced this probe from its angular cell.
    pub offsets: SensorOffsets,
    /// Index of the co-located loop source for canonical probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}
