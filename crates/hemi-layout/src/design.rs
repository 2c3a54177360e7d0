use std::fmt;
use std::str::FromStr;

use hemi_core::errors::{ErrorInfo, HemiError, INVALID_DESIGN_KIND};
use serde::{Deserialize, Serialize};

/// Supported magnet variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MagnetKind {
    /// A single flat coil approximated by one current loop.
    #[serde(rename = "SimpleCoil")]
    FlatCoil,
    /// A coil wound around a magnetised cylindrical core.
    #[serde(rename = "CoilCylinder")]
    CoilWithCore,
}

impl MagnetKind {
    /// Every supported variant in enumeration order.
    pub const ALL: [MagnetKind; 2] = [MagnetKind::FlatCoil, MagnetKind::CoilWithCore];

    /// Name used in persisted results and sweep plans.
    pub fn as_str(&self) -> &'static str {
        match self {
            MagnetKind::FlatCoil => "SimpleCoil",
            MagnetKind::CoilWithCore => "CoilCylinder",
        }
    }

    /// Prefix used when encoding configuration names.
    pub fn name_prefix(&self) -> &'static str {
        match self {
            MagnetKind::FlatCoil => "SimpleCoil",
            MagnetKind::CoilWithCore => "CoilCyl",
        }
    }
}

impl fmt::Display for MagnetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MagnetKind {
    type Err = HemiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        MagnetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| {
                HemiError::Design(
                    ErrorInfo::new(INVALID_DESIGN_KIND, "unsupported magnet variant")
                        .with_context("kind", name)
                        .with_hint("expected one of: SimpleCoil, CoilCylinder"),
                )
            })
    }
}

/// Sensor offset sets applied around every angular cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorOffsetSets {
    /// Radial offsets in m.
    #[serde(default = "SensorOffsetSets::default_radial")]
    pub radial: Vec<f64>,
    /// Azimuth offsets in radians.
    #[serde(default = "SensorOffsetSets::default_angular")]
    pub azimuth: Vec<f64>,
    /// Elevation offsets in radians.
    #[serde(default = "SensorOffsetSets::default_angular")]
    pub elevation: Vec<f64>,
    /// Extend the azimuth set with its negations.
    #[serde(default = "SensorOffsetSets::default_mirror")]
    pub mirror_angle_offsets: bool,
}

impl SensorOffsetSets {
    fn default_radial() -> Vec<f64> {
        vec![0.0, 0.005]
    }

    fn default_angular() -> Vec<f64> {
        vec![0.0]
    }

    const fn default_mirror() -> bool {
        true
    }

    /// Only the canonical placement: every set is `[0]`.
    pub fn canonical() -> Self {
        Self {
            radial: vec![0.0],
            azimuth: vec![0.0],
            elevation: vec![0.0],
            mirror_angle_offsets: false,
        }
    }

    /// Azimuth offsets after mirroring, de-duplicated by value in first-seen order.
    pub fn expanded_azimuth(&self) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::with_capacity(self.azimuth.len() * 2);
        let mirrored = self
            .mirror_angle_offsets
            .then(|| self.azimuth.iter().map(|offset| -offset))
            .into_iter()
            .flatten();
        for offset in self.azimuth.iter().copied().chain(mirrored) {
            if !values.contains(&offset) {
                values.push(offset);
            }
        }
        values
    }
}

impl Default for SensorOffsetSets {
    fn default() -> Self {
        Self {
            radial: Self::default_radial(),
            azimuth: Self::default_angular(),
            elevation: Self::default_angular(),
            mirror_angle_offsets: Self::default_mirror(),
        }
    }
}

/// Hemisphere placement parameters shared by every design of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    /// Shell radius in m.
    #[serde(default = "PlacementParams::default_radius")]
    pub radius: f64,
    /// Elevation steps over `[0, π/2]`, both ends included.
    #[serde(default = "PlacementParams::default_n_elevation")]
    pub n_elevation: usize,
    /// Azimuth steps over `[0, 2π)`.
    #[serde(default = "PlacementParams::default_n_azimuth")]
    pub n_azimuth: usize,
    /// Place a magnetised ferro centre with every source cluster.
    #[serde(default)]
    pub include_core: bool,
    /// Polarization of the ferro centre in T.
    #[serde(default = "PlacementParams::default_core_polarization")]
    pub core_polarization: [f64; 3],
    /// Ferro centre `(diameter, height)` in m.
    #[serde(default = "PlacementParams::default_core_dimension")]
    pub core_dimension: [f64; 2],
    /// Sensor offsets applied around each angular cell.
    #[serde(default)]
    pub sensor_offsets: SensorOffsetSets,
}

impl PlacementParams {
    const fn default_radius() -> f64 {
        0.1
    }

    const fn default_n_elevation() -> usize {
        4
    }

    const fn default_n_azimuth() -> usize {
        8
    }

    const fn default_core_polarization() -> [f64; 3] {
        [0.1, 0.2, 0.3]
    }

    const fn default_core_dimension() -> [f64; 2] {
        [0.01, 0.01]
    }
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            n_elevation: Self::default_n_elevation(),
            n_azimuth: Self::default_n_azimuth(),
            include_core: false,
            core_polarization: Self::default_core_polarization(),
            core_dimension: Self::default_core_dimension(),
            sensor_offsets: SensorOffsetSets::default(),
        }
    }
}

/// A single point of the design space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Magnet variant.
    pub magnet_kind: MagnetKind,
    /// Current per turn in A.
    pub current: f64,
    /// Number of turns.
    pub turns: u32,
    /// Coil (and core) diameter in m.
    pub coil_diameter: f64,
    /// Core height in m, required for [`MagnetKind::CoilWithCore`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coil_height: Option<f64>,
    /// Core magnetization in A/m, required for [`MagnetKind::CoilWithCore`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_magnetization: Option<[f64; 3]>,
    /// Hemisphere placement.
    #[serde(default)]
    pub placement: PlacementParams,
}

impl DesignConfig {
    /// Flat coil design.
    pub fn flat_coil(
        current: f64,
        turns: u32,
        coil_diameter: f64,
        placement: PlacementParams,
    ) -> Self {
        Self {
            magnet_kind: MagnetKind::FlatCoil,
            current,
            turns,
            coil_diameter,
            coil_height: None,
            core_magnetization: None,
            placement,
        }
    }

    /// Coil-with-core design.
    pub fn coil_with_core(
        current: f64,
        turns: u32,
        coil_diameter: f64,
        coil_height: f64,
        core_magnetization: [f64; 3],
        placement: PlacementParams,
    ) -> Self {
        Self {
            magnet_kind: MagnetKind::CoilWithCore,
            current,
            turns,
            coil_diameter,
            coil_height: Some(coil_height),
            core_magnetization: Some(core_magnetization),
            placement,
        }
    }

    /// Current of the equivalent single loop, `current × turns`.
    pub fn effective_current(&self) -> f64 {
        self.current * f64::from(self.turns)
    }
}
