#![deny(missing_docs)]
#![doc = "Core traits and data types for the hemisphere electromagnet design explorer."]

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use errors::{ErrorInfo, HemiError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{
    pole, Orientation, SensorOffsets, SensorSpec, SourceKind, SourceSpec, MU_0,
};

/// Computes magnetic flux density by superposition over a set of sources.
///
/// Implementations must accept batched queries mixing every [`SourceKind`]
/// and return one vector (in T) per query point, in query order.
pub trait FieldOracle: Send + Sync {
    /// Short identifier recorded in report provenance.
    fn name(&self) -> &str;

    /// Returns the field at each of `points` produced by all `sources`.
    fn query(
        &self,
        sources: &[SourceSpec],
        points: &[Vector3<f64>],
    ) -> Result<Vec<Vector3<f64>>, HemiError>;
}

/// Scalar objective evaluated by a [`GlobalOptimizer`].
pub type Objective<'a> = dyn FnMut(&[f64]) -> Result<f64, HemiError> + 'a;

/// Best point reported by a [`GlobalOptimizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Parameters of the best point found.
    pub best_params: Vec<f64>,
    /// Objective value at `best_params`.
    pub best_value: f64,
    /// Whether the optimizer met its tolerance before the iteration budget.
    pub converged: bool,
    /// Number of completed iterations (generations).
    pub iterations: usize,
    /// Number of objective evaluations.
    pub evaluations: usize,
}

/// Bounded continuous minimiser.
pub trait GlobalOptimizer {
    /// Minimises `objective` within `bounds` (one `(lo, hi)` pair per parameter).
    ///
    /// Exhausting the iteration budget is not an error: the best point is
    /// returned with `converged == false`. Objective errors abort the search.
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        bounds: &[(f64, f64)],
    ) -> Result<OptimizationOutcome, HemiError>;
}
