//! Data models for the weather probability service
//!
//! - Location: query coordinates
//! - Sample: daily observations, the merged sample set and retrieval outcomes
//! - Report: the probability report handed back to callers

pub mod location;
pub mod report;
pub mod sample;

// Re-export all public types for convenient access
pub use location::Location;
pub use report::{Averages, ExtremeValues, NO_DATA_MESSAGE, ProbabilityReport, ProbabilitySummary};
pub use sample::{DailySample, MonthDay, RetrievalOutcome, SampleSet};
