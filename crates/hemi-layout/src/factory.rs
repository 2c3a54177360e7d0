use hemi_core::errors::{ErrorInfo, HemiError, INVALID_DESIGN_KIND};
use hemi_core::{SourceSpec, MU_0};
use nalgebra::Vector3;

use crate::design::{DesignConfig, MagnetKind};

/// Loop diameter relative to the core for wound coils (winding standoff).
pub const WINDING_STANDOFF: f64 = 1.1;

fn incomplete(config: &DesignConfig, field: &str) -> HemiError {
    HemiError::Design(
        ErrorInfo::new(
            INVALID_DESIGN_KIND,
            "design does not describe its magnet variant",
        )
        .with_context("kind", config.magnet_kind.as_str())
        .with_context("missing", field),
    )
}

/// Builds the unplaced source descriptors of `config`.
///
/// Every descriptor is centred at the origin with identity orientation; the
/// layout generator places them. A flat coil yields a single loop carrying
/// `current × turns`. A coil with core yields that loop with its diameter
/// scaled by [`WINDING_STANDOFF`], followed by the core cylinder whose
/// polarization is `μ0 M` for the configured magnetization `M` (A/m).
pub fn build_sources(config: &DesignConfig) -> Result<Vec<SourceSpec>, HemiError> {
    let current = config.effective_current();
    match config.magnet_kind {
        MagnetKind::FlatCoil => Ok(vec![SourceSpec::current_loop(
            current,
            config.coil_diameter,
        )]),
        MagnetKind::CoilWithCore => {
            let height = config
                .coil_height
                .ok_or_else(|| incomplete(config, "coil_height"))?;
            let magnetization = config
                .core_magnetization
                .ok_or_else(|| incomplete(config, "core_magnetization"))?;
            let polarization = Vector3::from(magnetization) * MU_0;
            Ok(vec![
                SourceSpec::current_loop(current, config.coil_diameter * WINDING_STANDOFF),
                SourceSpec::cylinder(polarization, config.coil_diameter, height),
            ])
        }
    }
}
