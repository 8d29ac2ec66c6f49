//! Coarse reliability label from the distance between the requested and current year.
//!
//! This is not a statistical confidence interval.

use serde::{Deserialize, Serialize};

/// Reliability of the historical estimate for a requested year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reliability {
    /// Requested year is the current year
    High,
    /// One or two years away
    Good,
    /// More than two years away
    Reduced,
}

impl Reliability {
    /// Classify by `|target_year - current_year|`.
    #[must_use]
    pub fn for_years(target_year: i32, current_year: i32) -> Self {
        match (i64::from(target_year) - i64::from(current_year)).abs() {
            0 => Reliability::High,
            1..=2 => Reliability::Good,
            _ => Reliability::Reduced,
        }
    }

    /// Message attached to the report as `quality_message`
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Reliability::High => "High reliability (recent date).",
            Reliability::Good => "Good reliability (small temporal distance).",
            Reliability::Reduced => "⚠️ Reduced reliability for dates far from the present.",
        }
    }
}
