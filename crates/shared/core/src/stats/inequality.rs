//! Wealth inequality

/// Gini coefficient of a wealth distribution
///
/// 0 = perfect equality, (n - 1) / n = one holder owns everything.
/// Negative holdings are floored at zero; an empty or all-zero
/// distribution has a Gini of 0.
pub fn gini(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = values.iter().map(|v| v.max(0.0)).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (i as f64 + 1.0) * x)
        .sum();

    (2.0 * weighted / (n * total) - (n + 1.0) / n).max(0.0)
}
