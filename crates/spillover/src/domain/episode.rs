//! Contagion Episodes

use serde::{Deserialize, Serialize};

/// Named detection heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Threshold,
    Regime,
    Correlation,
    Volatility,
}

impl DetectionMethod {
    pub const ALL: [DetectionMethod; 4] = [
        DetectionMethod::Threshold,
        DetectionMethod::Regime,
        DetectionMethod::Correlation,
        DetectionMethod::Volatility,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DetectionMethod::Threshold => "threshold",
            DetectionMethod::Regime => "regime",
            DetectionMethod::Correlation => "correlation",
            DetectionMethod::Volatility => "volatility",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Severity tier from peak spillover
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Peak above the severe cut-off is severe, above the moderate one moderate
    pub fn classify(peak: f64, moderate_cutoff: f64, severe_cutoff: f64) -> Self {
        if peak > severe_cutoff {
            Severity::Severe
        } else if peak > moderate_cutoff {
            Severity::Moderate
        } else {
            Severity::Mild
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        };
        write!(f, "{}", name)
    }
}

/// Maximal run of consensus periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContagionEpisode {
    /// First period (inclusive)
    pub start: usize,
    /// Last period (inclusive)
    pub end: usize,
    pub duration: usize,
    pub peak_spillover: f64,
    pub average_spillover: f64,
    pub severity: Severity,
    /// Methods that flagged at least one period of the episode
    pub methods: Vec<DetectionMethod>,
}

impl ContagionEpisode {
    pub fn contains(&self, period: usize) -> bool {
        period >= self.start && period <= self.end
    }
}

/// Inclusive (start, end) intervals of consecutive `true` flags
pub fn flagged_runs(flags: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (t, &flag) in flags.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(t),
            (false, Some(s)) => {
                runs.push((s, t - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, flags.len() - 1));
    }

    runs
}
