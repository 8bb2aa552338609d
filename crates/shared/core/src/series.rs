//! Return Series
//!
//! Rectangular periods × assets matrix of simple returns supplied by an
//! external data collaborator.

use crate::error::{AgoraError, Result};
use serde::{Deserialize, Serialize};

/// Validated return series (rows = periods, columns = assets)
///
/// Construction guarantees: at least one period, at least one asset, every
/// row has the same width and every value is finite. Serialized as a plain
/// array of rows; deserialization runs the same checks as `from_rows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ReturnSeries {
    rows: Vec<Vec<f64>>,
    n_assets: usize,
}

impl ReturnSeries {
    /// Build from rows of per-asset returns
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_assets = validate_matrix(&rows, "return series")?;
        Ok(Self { rows, n_assets })
    }

    /// Series with the same return for every period and asset
    pub fn constant(n_periods: usize, n_assets: usize, value: f64) -> Result<Self> {
        Self::from_rows(vec![vec![value; n_assets]; n_periods])
    }

    pub fn n_periods(&self) -> usize {
        self.rows.len()
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Returns for period `t`, falling back to the last period when `t` is past the end
    pub fn row_clamped(&self, t: usize) -> &[f64] {
        let idx = t.min(self.rows.len() - 1);
        &self.rows[idx]
    }

    pub fn row(&self, t: usize) -> Option<&[f64]> {
        self.rows.get(t).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Column of returns for one asset
    pub fn column(&self, asset: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[asset]).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for ReturnSeries {
    type Error = AgoraError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ReturnSeries> for Vec<Vec<f64>> {
    fn from(series: ReturnSeries) -> Self {
        series.rows
    }
}

/// Validate a rectangular, finite, non-empty matrix and return its width
pub fn validate_matrix(rows: &[Vec<f64>], what: &str) -> Result<usize> {
    let first = rows
        .first()
        .ok_or_else(|| AgoraError::data_shape(format!("{} has no periods", what)))?;
    let width = first.len();
    if width == 0 {
        return Err(AgoraError::data_shape(format!("{} has no assets", what)));
    }

    for (t, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(AgoraError::data_shape(format!(
                "{} row {} has {} assets, expected {}",
                what,
                t,
                row.len(),
                width
            )));
        }
        if let Some(asset) = row.iter().position(|v| !v.is_finite()) {
            return Err(AgoraError::data_shape(format!(
                "{} has a non-finite value at period {}, asset {}",
                what, t, asset
            )));
        }
    }

    Ok(width)
}
