use hemi_core::errors::{ErrorInfo, HemiError, INVALID_DESIGN_KIND};
use hemi_layout::{DesignConfig, MagnetKind, PlacementParams};

fn name_error(name: &str, message: &str) -> HemiError {
    HemiError::Config(ErrorInfo::new("config-name", message).with_context("name", name))
}

fn magnetization_token(magnetization: &[f64; 3]) -> String {
    match magnetization {
        [x, y, z] if *x == 0.0 && *y == 0.0 => format!("m{z}"),
        [x, y, z] => format!("m{x},{y},{z}"),
    }
}

/// Deterministic name encoding every varied parameter of `config`.
///
/// `SimpleCoil_d{d}_c{c}_t{t}` for flat coils and
/// `CoilCyl_d{d}_c{c}_t{t}_h{h}_m{mz}` for coils with core. The magnetization
/// token lists all three components when the vector is not along the axis.
pub fn config_name(config: &DesignConfig) -> String {
    let mut name = format!(
        "{}_d{}_c{}_t{}",
        config.magnet_kind.name_prefix(),
        config.coil_diameter,
        config.current,
        config.turns
    );
    if config.magnet_kind == MagnetKind::CoilWithCore {
        if let Some(height) = config.coil_height {
            name.push_str(&format!("_h{height}"));
        }
        if let Some(magnetization) = &config.core_magnetization {
            name.push('_');
            name.push_str(&magnetization_token(magnetization));
        }
    }
    name
}

fn parse_float(name: &str, token: &str) -> Result<f64, HemiError> {
    token
        .parse::<f64>()
        .map_err(|_| name_error(name, "malformed numeric token").with_context("token", token))
}

/// Rebuilds the design encoded by [`config_name`], using `placement` for the
/// parameters the name does not carry.
pub fn parse_config_name(
    name: &str,
    placement: &PlacementParams,
) -> Result<DesignConfig, HemiError> {
    let mut tokens = name.split('_');
    let prefix = tokens.next().unwrap_or_default();
    let kind = MagnetKind::ALL
        .into_iter()
        .find(|kind| kind.name_prefix() == prefix)
        .ok_or_else(|| {
            HemiError::Design(
                ErrorInfo::new(INVALID_DESIGN_KIND, "unknown configuration name prefix")
                    .with_context("name", name),
            )
        })?;

    let mut diameter = None;
    let mut current = None;
    let mut turns = None;
    let mut height = None;
    let mut magnetization = None;
    for token in tokens {
        let mut chars = token.chars();
        let tag = chars.next();
        let value = chars.as_str();
        match tag {
            Some('d') => diameter = Some(parse_float(name, value)?),
            Some('c') => current = Some(parse_float(name, value)?),
            Some('t') => {
                turns = Some(value.parse::<u32>().map_err(|_| {
                    name_error(name, "malformed turn count").with_context("token", token)
                })?)
            }
            Some('h') => height = Some(parse_float(name, value)?),
            Some('m') => {
                let components = value
                    .split(',')
                    .map(|part| parse_float(name, part))
                    .collect::<Result<Vec<_>, _>>()?;
                magnetization = Some(match components.as_slice() {
                    [z] => [0.0, 0.0, *z],
                    [x, y, z] => [*x, *y, *z],
                    _ => return Err(name_error(name, "magnetization needs 1 or 3 components")),
                });
            }
            _ => {
                return Err(name_error(name, "unknown token").with_context("token", token));
            }
        }
    }

    let missing = |field: &str| name_error(name, "missing token").with_context("field", field);
    let current = current.ok_or_else(|| missing("c"))?;
    let turns = turns.ok_or_else(|| missing("t"))?;
    let diameter = diameter.ok_or_else(|| missing("d"))?;
    match kind {
        MagnetKind::FlatCoil => Ok(DesignConfig::flat_coil(
            current,
            turns,
            diameter,
            placement.clone(),
        )),
        MagnetKind::CoilWithCore => Ok(DesignConfig::coil_with_core(
            current,
            turns,
            diameter,
            height.ok_or_else(|| missing("h"))?,
            magnetization.ok_or_else(|| missing("m"))?,
            placement.clone(),
        )),
    }
}
