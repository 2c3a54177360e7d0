use hemi_core::errors::{ErrorInfo, HemiError};

fn shape_error(message: &str, values: usize, coords: usize) -> HemiError {
    HemiError::Config(
        ErrorInfo::new("config-gradient", message)
            .with_context("values", values.to_string())
            .with_context("coordinates", coords.to_string()),
    )
}

/// Derivative of `values` sampled at the strictly increasing `coords`.
///
/// Interior points use the second-order non-uniform central difference
/// `(-hs/(hd(hd+hs))) f[i-1] + ((hs-hd)/(hd hs)) f[i] + (hd/(hs(hd+hs))) f[i+1]`
/// with `hd = x[i]-x[i-1]` and `hs = x[i+1]-x[i]`. The two edges use
/// first-order one-sided differences.
pub fn gradient_1d(values: &[f64], coords: &[f64]) -> Result<Vec<f64>, HemiError> {
    let n = values.len();
    if n != coords.len() || n < 2 {
        return Err(shape_error(
            "gradient needs at least two samples with one coordinate each",
            n,
            coords.len(),
        ));
    }
    let mut out = vec![0.0; n];
    out[0] = (values[1] - values[0]) / (coords[1] - coords[0]);
    out[n - 1] = (values[n - 1] - values[n - 2]) / (coords[n - 1] - coords[n - 2]);
    for i in 1..n - 1 {
        let hd = coords[i] - coords[i - 1];
        let hs = coords[i + 1] - coords[i];
        let a = -hs / (hd * (hd + hs));
        let b = (hs - hd) / (hd * hs);
        let c = hd / (hs * (hd + hs));
        out[i] = a * values[i - 1] + b * values[i] + c * values[i + 1];
    }
    Ok(out)
}

/// Gradient of a row-major field `values[i2 * axis1.len() + i1]`.
///
/// Returns `(∂/∂axis1, ∂/∂axis2)`, both in the same layout as `values`.
pub fn gradient_2d(
    values: &[f64],
    axis1: &[f64],
    axis2: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), HemiError> {
    let (n1, n2) = (axis1.len(), axis2.len());
    if n1 < 2 || n2 < 2 || values.len() != n1 * n2 {
        return Err(shape_error(
            "grid values do not match the axis lengths",
            values.len(),
            n1 * n2,
        ));
    }
    let mut d_axis1 = vec![0.0; values.len()];
    for (row_out, row) in d_axis1.chunks_mut(n1).zip(values.chunks(n1)) {
        row_out.copy_from_slice(&gradient_1d(row, axis1)?);
    }

    let mut d_axis2 = vec![0.0; values.len()];
    let mut column = vec![0.0; n2];
    for i1 in 0..n1 {
        for (i2, slot) in column.iter_mut().enumerate() {
            *slot = values[i2 * n1 + i1];
        }
        for (i2, derivative) in gradient_1d(&column, axis2)?.into_iter().enumerate() {
            d_axis2[i2 * n1 + i1] = derivative;
        }
    }
    Ok((d_axis1, d_axis2))
}
