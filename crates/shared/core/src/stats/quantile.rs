//! Quantiles with linear interpolation between order statistics

/// Quantile `q` in [0, 1] of `values`
///
/// Position `q * (n - 1)` in the sorted sample, interpolated linearly.
/// Returns `None` for an empty sample; NaN values sort last.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Median (0.5 quantile)
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}
