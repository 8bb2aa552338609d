//! Pearson correlation and its significance test

use super::{VARIANCE_EPSILON, mean};
use crate::error::{AgoraError, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Pearson correlation of two equally long samples
///
/// Fails with `Numerical` when either sample is (near-)constant, since the
/// correlation is undefined there.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AgoraError::data_shape(format!(
            "correlation inputs differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AgoraError::data_shape(
            "correlation needs at least two observations",
        ));
    }

    let mean_x = mean(x).unwrap_or(0.0);
    let mean_y = mean(y).unwrap_or(0.0);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let n = x.len() as f64;
    if var_x / n < VARIANCE_EPSILON || var_y / n < VARIANCE_EPSILON {
        return Err(AgoraError::numerical(
            "correlation undefined for constant series",
        ));
    }

    Ok((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Two-sided p-value of H0: rho = 0 for a sample correlation `r` over `n` observations
///
/// Uses t = r * sqrt((n - 2) / (1 - r^2)) against Student's t with n - 2
/// degrees of freedom.
pub fn correlation_p_value(r: f64, n: usize) -> Result<f64> {
    if n < 3 {
        return Err(AgoraError::configuration(format!(
            "significance test needs at least 3 observations, got {}",
            n
        )));
    }
    if !r.is_finite() {
        return Err(AgoraError::numerical("correlation is not finite"));
    }

    let r2 = r * r;
    if r2 >= 1.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r2)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AgoraError::numerical(format!("student-t: {}", e)))?;

    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_correlation() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

        let z: Vec<f64> = x.iter().map(|v| -v).collect();
        assert_relative_eq!(pearson(&x, &z).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_series_is_numerical_error() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![0.5, 0.5, 0.5];
        let err = pearson(&x, &y).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_length_mismatch() {
        let err = pearson(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, AgoraError::DataShape(_)));
    }

    #[test]
    fn test_p_value_zero_correlation() {
        assert_relative_eq!(correlation_p_value(0.0, 30).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_p_value_strong_correlation_is_significant() {
        let p = correlation_p_value(0.9, 30).unwrap();
        assert!(p < 0.001, "p = {}", p);
    }

    #[test]
    fn test_p_value_weak_correlation_small_sample() {
        let p = correlation_p_value(0.2, 10).unwrap();
        assert!(p > 0.05, "p = {}", p);
    }

    #[test]
    fn test_p_value_known_value() {
        // r = 0.5, n = 12 -> t = 0.5 * sqrt(10 / 0.75) = 1.8257, df = 10, p ~= 0.0979
        let p = correlation_p_value(0.5, 12).unwrap();
        assert_relative_eq!(p, 0.0979, epsilon = 1e-3);
    }

    #[test]
    fn test_p_value_needs_three_observations() {
        assert!(correlation_p_value(0.5, 2).is_err());
    }
}
