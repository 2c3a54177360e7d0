#![deny(missing_docs)]
#![doc = "Planar field evaluation, energy gradients and design metrics."]

/// Finite-difference gradients over non-uniform grids.
pub mod gradient;
/// Planar slice evaluation.
pub mod grid;
/// Scalar performance metrics.
pub mod metrics;
/// Discrete sensor evaluation.
pub mod points;

pub use gradient::{gradient_1d, gradient_2d};
pub use grid::{
    evaluate_grid, evaluate_views, linspace, EvaluationSettings, FieldGrid, FieldUnits,
    FieldViews, PlanePair,
};
pub use metrics::{calculate_metrics, composite_score, MetricsRecord, ViewMetrics, ENERGY_EPSILON};
pub use points::{evaluate_points, PointField};
