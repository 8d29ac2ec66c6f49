//! Request-scoped orchestration: collect, estimate, qualify
//!
//! The service holds only immutable configuration and the data source handle, so
//! one instance serves every request without sharing per-request state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument};

use crate::analysis::{ProbabilityEstimator, Reliability};
use crate::collector::HistoricalSampleCollector;
use crate::config::{HistoryConfig, ServiceConfig};
use crate::error::ServiceError;
use crate::models::{Location, MonthDay, ProbabilityReport, RetrievalOutcome};
use crate::power::{DailyRecordSource, PowerClient};

/// Validated input for one assessment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityQuery {
    pub location: Location,
    /// Year the caller asked about; only drives the reliability qualifier
    pub target_year: i32,
    pub month_day: MonthDay,
}

/// Everything one assessment produced
#[derive(Debug)]
pub struct Assessment {
    pub report: ProbabilityReport,
    pub reliability: Reliability,
    /// Per-year outcomes, oldest first, failures included
    pub outcomes: Vec<RetrievalOutcome>,
}

/// JSON body returned to HTTP callers
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityResponse {
    #[serde(flatten)]
    pub report: ProbabilityReport,
    pub quality_message: String,
}

impl From<&Assessment> for ProbabilityResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            report: assessment.report.clone(),
            quality_message: assessment.reliability.message().to_string(),
        }
    }
}

/// Historical probability service
#[derive(Clone)]
pub struct ProbabilityService {
    collector: HistoricalSampleCollector,
    history: HistoryConfig,
}

impl ProbabilityService {
    /// Build a service around any record source.
    ///
    /// Collection is bounded by the server's request timeout, so years that would
    /// outlast it fail individually instead of the whole request timing out.
    pub fn new(source: Arc<dyn DailyRecordSource>, config: &ServiceConfig) -> Self {
        // the collector's own bound must outlast the client's timeout and its retries
        let attempts = config.power.max_retries + 1;
        let fetch_timeout =
            Duration::from_secs(u64::from(config.power.timeout_seconds) * u64::from(attempts) + 5);

        Self {
            collector: HistoricalSampleCollector::new(
                source,
                config.power.max_concurrent_requests,
                fetch_timeout,
            )
            .with_collection_budget(config.server.collection_budget()),
            history: config.history.clone(),
        }
    }

    /// Build a service backed by the NASA POWER API.
    pub fn with_power_client(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = PowerClient::new(&config.power)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Run collection, estimation and qualification for one query.
    #[instrument(skip(self), fields(location = %query.location.format_coordinates()))]
    pub async fn assess(&self, query: ProbabilityQuery, current_year: i32) -> Assessment {
        let collection = self
            .collector
            .collect(query.location, query.month_day, self.history.years())
            .await;

        let report = ProbabilityEstimator::estimate(&collection.samples);
        let reliability = Reliability::for_years(query.target_year, current_year);

        info!(
            "Assessment from {} samples ({} failed years), reliability {:?}",
            collection.samples.len(),
            collection.failure_count(),
            reliability
        );

        Assessment {
            report,
            reliability,
            outcomes: collection.outcomes,
        }
    }
}
