//! Historical extreme-weather probabilities
//!
//! For a point and a calendar day, this library collects one daily record per
//! year over a decade-long window, then derives thresholds and exceedance
//! probabilities for very hot, very cold, very windy and very wet conditions.

pub mod analysis;
pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod models;
pub mod power;
pub mod service;
pub mod web;

// Re-export core types for public API
pub use analysis::{ProbabilityEstimator, Reliability};
pub use collector::{HistoricalCollection, HistoricalSampleCollector};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use models::{DailySample, Location, MonthDay, ProbabilityReport, RetrievalOutcome, SampleSet};
pub use power::{DailyRecordSource, PowerClient, RetrievalError};
pub use service::{Assessment, ProbabilityQuery, ProbabilityResponse, ProbabilityService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ServiceError>;
