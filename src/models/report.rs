//! Probability report returned for one request

use serde::{Deserialize, Serialize};

/// Message of the degenerate report produced for an empty sample set
pub const NO_DATA_MESSAGE: &str = "⚠️ No historical data available for this day.";

/// One value per extreme category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeValues {
    pub very_hot: f64,
    pub very_cold: f64,
    pub very_windy: f64,
    pub very_wet: f64,
}

/// Arithmetic means over the sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    /// Celsius
    pub temperature: f64,
    /// m/s
    pub wind: f64,
    /// mm/day
    pub precipitation: f64,
}

/// Statistics computed from a non-empty sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySummary {
    /// Exceedance probabilities in percent, in `[0, 100]`
    pub probabilities: ExtremeValues,
    pub averages: Averages,
    pub thresholds: ExtremeValues,
    /// Human-readable narrative, every value at one decimal place
    pub message: String,
}

/// Output of the estimator.
///
/// Serializes either as the full summary object or, with no samples, as an
/// object holding only `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbabilityReport {
    Summary(ProbabilitySummary),
    NoData { message: String },
}

impl ProbabilityReport {
    #[must_use]
    pub fn no_data() -> Self {
        ProbabilityReport::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ProbabilityReport::Summary(summary) => &summary.message,
            ProbabilityReport::NoData { message } => message,
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<&ProbabilitySummary> {
        match self {
            ProbabilityReport::Summary(summary) => Some(summary),
            ProbabilityReport::NoData { .. } => None,
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        matches!(self, ProbabilityReport::Summary(_))
    }
}
