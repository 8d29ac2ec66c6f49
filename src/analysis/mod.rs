//! Statistical analysis of the collected samples
//!
//! - stats: mean, sample standard deviation, linear-interpolation quantiles
//! - estimator: thresholds, exceedance probabilities and the narrative
//! - reliability: qualifier from the temporal distance of the requested year

pub mod estimator;
pub mod reliability;
pub mod stats;

pub use estimator::ProbabilityEstimator;
pub use reliability::Reliability;
