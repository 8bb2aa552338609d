//! Rolling statistics over a fixed-size window

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling statistics over the most recent `window_size` values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingStats {
    /// Values in the window
    values: VecDeque<f64>,
    /// Window size
    window_size: usize,
    /// Running sum for O(1) mean updates
    sum: f64,
}

impl RollingStats {
    /// Create a new rolling stats calculator
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    /// Add a value, evicting the oldest once the window is full
    #[inline]
    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.window_size {
            if let Some(removed) = self.values.pop_front() {
                self.sum -= removed;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    /// Get current mean
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum / self.values.len() as f64)
    }

    /// Get current population variance
    ///
    /// Recomputed from the window rather than from running sums so that long
    /// runs do not accumulate cancellation error.
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let ss: f64 = self.values.iter().map(|x| (x - mean).powi(2)).sum();
        Some(ss / self.values.len() as f64)
    }

    /// Get population standard deviation
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Get the last value
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Get number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if window is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.window_size
    }

    /// Get the window size
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Clear all values
    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
