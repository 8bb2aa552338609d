//! Floating-point statistics for market analysis
//!
//! # Design
//!
//! - Plain `f64` slices in, `Option`/`Result` out
//! - Population moments (ddof = 0) unless a function says otherwise
//! - Degenerate inputs are reported, never silently turned into NaN

mod correlation;
mod inequality;
mod quantile;
mod rolling;

pub use correlation::{correlation_p_value, pearson};
pub use inequality::gini;
pub use quantile::{median, quantile};
pub use rolling::RollingStats;

use crate::error::{AgoraError, Result};

/// Variance below this is treated as zero
pub const VARIANCE_EPSILON: f64 = 1e-18;

/// Calculate sum
#[inline]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Calculate mean
#[inline]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

/// Population variance
pub fn variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some(ss / values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Sample standard deviation (ddof = 1)
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Calculate min of a slice
#[inline]
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Calculate max of a slice
#[inline]
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Simple return: (new - old) / old
#[inline]
pub fn simple_return(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        return None;
    }
    Some((new - old) / old)
}

/// Log returns of a strictly positive price path
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if let Some(bad) = prices.iter().position(|p| !(p.is_finite() && *p > 0.0)) {
        return Err(AgoraError::data_shape(format!(
            "price at index {} is not a positive finite number",
            bad
        )));
    }
    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.0));
        assert_relative_eq!(variance(&values).unwrap(), 2.0);
        assert_relative_eq!(sample_std_dev(&values).unwrap(), 2.5f64.sqrt());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[1.0]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_min_max() {
        let values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
        assert_eq!(min(&values), Some(1.0));
        assert_eq!(max(&values), Some(9.0));
    }

    #[test]
    fn test_log_returns() {
        let returns = log_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], (1.1f64).ln());
        assert_relative_eq!(returns[1], (0.9f64).ln());
    }

    #[test]
    fn test_log_returns_rejects_non_positive() {
        assert!(log_returns(&[100.0, 0.0]).is_err());
        assert!(log_returns(&[100.0, -5.0]).is_err());
    }

    #[test]
    fn test_simple_return() {
        assert_relative_eq!(simple_return(100.0, 110.0).unwrap(), 0.1);
        assert_eq!(simple_return(0.0, 1.0), None);
    }
}
