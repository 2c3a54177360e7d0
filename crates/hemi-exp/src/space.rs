use std::collections::BTreeMap;

use hemi_core::errors::HemiError;
use hemi_layout::{DesignConfig, MagnetKind, PlacementParams};
use serde::{Deserialize, Serialize};

/// Coil diameter.
pub const AXIS_COIL_DIAMETER: &str = "coil_diameter";
/// Current per turn.
pub const AXIS_CURRENT: &str = "current";
/// Turn count.
pub const AXIS_TURNS: &str = "turns";
/// Core height, coil-with-core only.
pub const AXIS_COIL_HEIGHT: &str = "coil_height";
/// Core magnetization, coil-with-core only.
pub const AXIS_CORE_MAGNETIZATION: &str = "core_magnetization";

/// A discrete value on a design axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisValue {
    /// Scalar length or current.
    Scalar(f64),
    /// Integer count.
    Count(u32),
    /// Three-component vector.
    Vector([f64; 3]),
}

/// A named axis with its discrete values.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Axis name.
    pub name: &'static str,
    /// Values in enumeration order.
    pub values: Vec<AxisValue>,
}

impl Axis {
    fn scalars(name: &'static str, values: &[f64]) -> Self {
        Self {
            name,
            values: values.iter().copied().map(AxisValue::Scalar).collect(),
        }
    }
}

/// Declared design space: which magnet kinds are swept and the discrete
/// values of every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    /// Magnet kind names, parsed when the space is enumerated.
    #[serde(default = "ParameterSpace::default_kinds")]
    pub magnet_kinds: Vec<String>,
    /// Coil diameters in m.
    #[serde(default = "ParameterSpace::default_diameters")]
    pub coil_diameters: Vec<f64>,
    /// Currents per turn in A.
    #[serde(default = "ParameterSpace::default_currents")]
    pub currents: Vec<f64>,
    /// Turn counts.
    #[serde(default = "ParameterSpace::default_turns")]
    pub turns: Vec<u32>,
    /// Core heights in m.
    #[serde(default = "ParameterSpace::default_heights")]
    pub coil_heights: Vec<f64>,
    /// Core magnetizations in A/m.
    #[serde(default = "ParameterSpace::default_magnetizations")]
    pub core_magnetizations: Vec<[f64; 3]>,
}

impl ParameterSpace {
    fn default_kinds() -> Vec<String> {
        MagnetKind::ALL.iter().map(|kind| kind.as_str().to_string()).collect()
    }

    fn default_diameters() -> Vec<f64> {
        vec![0.03, 0.05, 0.07]
    }

    fn default_currents() -> Vec<f64> {
        vec![0.3, 0.5, 0.7]
    }

    fn default_turns() -> Vec<u32> {
        vec![150, 250, 350]
    }

    fn default_heights() -> Vec<f64> {
        vec![0.01, 0.02]
    }

    fn default_magnetizations() -> Vec<[f64; 3]> {
        vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.5]]
    }

    /// Axes swept for `kind`, in enumeration order.
    pub fn axes_for(&self, kind: MagnetKind) -> Vec<Axis> {
        let mut axes = vec![
            Axis::scalars(AXIS_COIL_DIAMETER, &self.coil_diameters),
            Axis::scalars(AXIS_CURRENT, &self.currents),
            Axis {
                name: AXIS_TURNS,
                values: self.turns.iter().copied().map(AxisValue::Count).collect(),
            },
        ];
        if kind == MagnetKind::CoilWithCore {
            axes.push(Axis::scalars(AXIS_COIL_HEIGHT, &self.coil_heights));
            axes.push(Axis {
                name: AXIS_CORE_MAGNETIZATION,
                values: self
                    .core_magnetizations
                    .iter()
                    .copied()
                    .map(AxisValue::Vector)
                    .collect(),
            });
        }
        axes
    }

    /// Number of designs the space would enumerate (unknown kinds count as one).
    pub fn len(&self) -> usize {
        self.magnet_kinds
            .iter()
            .map(|name| match name.parse::<MagnetKind>() {
                Ok(kind) => self
                    .axes_for(kind)
                    .iter()
                    .map(|axis| axis.values.len())
                    .product::<usize>(),
                Err(_) => 1,
            })
            .sum()
    }

    /// Whether the space enumerates nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates the cartesian product kind → diameter → current → turns
    /// (→ height → magnetization for coils with core).
    ///
    /// An unrecognised kind name yields a single [`Candidate::Invalid`].
    pub fn enumerate(&self, placement: &PlacementParams) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(self.len());
        for name in &self.magnet_kinds {
            let kind = match name.parse::<MagnetKind>() {
                Ok(kind) => kind,
                Err(error) => {
                    candidates.push(Candidate::Invalid {
                        label: name.clone(),
                        error,
                    });
                    continue;
                }
            };
            let mut points = Vec::new();
            expand_grid(&self.axes_for(kind), 0, BTreeMap::new(), &mut points);
            candidates.extend(
                points
                    .iter()
                    .map(|point| Candidate::Design(design_from_point(kind, point, placement))),
            );
        }
        candidates
    }
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self {
            magnet_kinds: Self::default_kinds(),
            coil_diameters: Self::default_diameters(),
            currents: Self::default_currents(),
            turns: Self::default_turns(),
            coil_heights: Self::default_heights(),
            core_magnetizations: Self::default_magnetizations(),
        }
    }
}

/// One enumerated point of the design space.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// A complete design.
    Design(DesignConfig),
    /// A kind name that could not be parsed.
    Invalid {
        /// The offending name.
        label: String,
        /// Parse error, carrying `invalid-design-kind`.
        error: HemiError,
    },
}

fn expand_grid(
    axes: &[Axis],
    idx: usize,
    current: BTreeMap<&'static str, AxisValue>,
    outputs: &mut Vec<BTreeMap<&'static str, AxisValue>>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    let axis = &axes[idx];
    for value in &axis.values {
        let mut next = current.clone();
        next.insert(axis.name, *value);
        expand_grid(axes, idx + 1, next, outputs);
    }
}

fn scalar(point: &BTreeMap<&'static str, AxisValue>, name: &str) -> Option<f64> {
    match point.get(name) {
        Some(AxisValue::Scalar(value)) => Some(*value),
        _ => None,
    }
}

fn design_from_point(
    kind: MagnetKind,
    point: &BTreeMap<&'static str, AxisValue>,
    placement: &PlacementParams,
) -> DesignConfig {
    let turns = match point.get(AXIS_TURNS) {
        Some(AxisValue::Count(turns)) => *turns,
        _ => 0,
    };
    let core_magnetization = match point.get(AXIS_CORE_MAGNETIZATION) {
        Some(AxisValue::Vector(vector)) => Some(*vector),
        _ => None,
    };
    DesignConfig {
        magnet_kind: kind,
        current: scalar(point, AXIS_CURRENT).unwrap_or_default(),
        turns,
        coil_diameter: scalar(point, AXIS_COIL_DIAMETER).unwrap_or_default(),
        coil_height: scalar(point, AXIS_COIL_HEIGHT),
        core_magnetization,
        placement: placement.clone(),
    }
}
