//! Historical sample collection for one calendar day across a year window
//!
//! Years are fetched concurrently through a bounded pool. The sample set is only
//! assembled once every attempted year has finished or failed, so dropping the
//! collection future part-way leaves nothing half-built.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::models::{Location, MonthDay, RetrievalOutcome, SampleSet};
use crate::power::{DailyRecordSource, RetrievalError};

/// Merged samples together with the outcome of every attempted year
#[derive(Debug)]
pub struct HistoricalCollection {
    pub samples: SampleSet,
    /// One entry per attempted year, oldest first
    pub outcomes: Vec<RetrievalOutcome>,
}

impl HistoricalCollection {
    /// Failed years and their reasons
    pub fn failures(&self) -> impl Iterator<Item = (i32, &RetrievalError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RetrievalOutcome::Failed { year, reason } => Some((*year, reason)),
            RetrievalOutcome::Retrieved(_) => None,
        })
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Collects one daily sample per year for a fixed calendar day
#[derive(Clone)]
pub struct HistoricalSampleCollector {
    source: Arc<dyn DailyRecordSource>,
    max_concurrent: usize,
    fetch_timeout: Duration,
    collection_budget: Option<Duration>,
}

impl HistoricalSampleCollector {
    pub fn new(
        source: Arc<dyn DailyRecordSource>,
        max_concurrent: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            max_concurrent: max_concurrent.max(1),
            fetch_timeout,
            collection_budget: None,
        }
    }

    /// Bound the whole collection. Years still pending when the budget runs out,
    /// queued ones included, fail with a timeout.
    #[must_use]
    pub fn with_collection_budget(mut self, budget: Duration) -> Self {
        self.collection_budget = Some(budget);
        self
    }

    /// Attempt every year in `years` and merge the successful ones.
    ///
    /// Coordinates must already be validated. Individual failures are logged and
    /// recorded in the outcome log; if every year fails the sample set is empty.
    #[instrument(skip_all, fields(location = %location.format_coordinates(), month_day = %month_day))]
    pub async fn collect(
        &self,
        location: Location,
        month_day: MonthDay,
        years: impl IntoIterator<Item = i32>,
    ) -> HistoricalCollection {
        let deadline = self.collection_budget.map(|budget| Instant::now() + budget);
        let mut outcomes: Vec<RetrievalOutcome> = stream::iter(years)
            .map(|year| self.fetch_year(location, month_day, year, deadline))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        // completion order is arbitrary, merge order is not
        outcomes.sort_by_key(RetrievalOutcome::year);

        let samples = SampleSet::new(
            outcomes
                .iter()
                .filter_map(RetrievalOutcome::sample)
                .copied()
                .collect(),
        );

        let collection = HistoricalCollection { samples, outcomes };
        info!(
            "Collected {} of {} years ({} failed)",
            collection.samples.len(),
            collection.outcomes.len(),
            collection.failure_count()
        );
        debug!("Retrieved years {:?}", collection.samples.years());
        collection
    }

    async fn fetch_year(
        &self,
        location: Location,
        month_day: MonthDay,
        year: i32,
        deadline: Option<Instant>,
    ) -> RetrievalOutcome {
        let result = match month_day.in_year(year) {
            Some(date) => {
                let started = Instant::now();
                let mut year_deadline = started + self.fetch_timeout;
                if let Some(deadline) = deadline {
                    year_deadline = year_deadline.min(deadline);
                }
                match tokio::time::timeout_at(year_deadline, self.source.fetch_day(location, date))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(RetrievalError::Timeout {
                        after: year_deadline.saturating_duration_since(started),
                    }),
                }
            }
            None => Err(RetrievalError::InvalidDate {
                year,
                month_day: month_day.to_string(),
            }),
        };

        match result {
            Ok(sample) => RetrievalOutcome::Retrieved(sample),
            Err(reason) => {
                warn!("Could not retrieve data for {}: {}", year, reason);
                RetrievalOutcome::Failed { year, reason }
            }
        }
    }
}
