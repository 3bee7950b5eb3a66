use crate::tolerance::Tolerance;

/// Root-mean-square norm, `‖x‖₂ / √n`. Zero for an empty slice.
pub fn rms_norm(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Per-component error scale `atol_i + rtol * |y_i|`.
pub fn error_scale(y: &[f64], rtol: f64, atol: &Tolerance) -> Vec<f64> {
    y.iter()
        .enumerate()
        .map(|(i, yi)| atol[i] + yi.abs() * rtol)
        .collect()
}

/// RMS norm of `values / scale`, component-wise.
pub fn scaled_rms_norm(values: &[f64], scale: &[f64]) -> f64 {
    let scaled: Vec<f64> = values.iter().zip(scale).map(|(v, s)| v / s).collect();
    rms_norm(&scaled)
}
