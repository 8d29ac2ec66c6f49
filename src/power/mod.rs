//! Historical daily point data from the NASA POWER API
//!
//! The collector only sees the [`DailyRecordSource`] trait; [`PowerClient`] is the
//! production implementation. Transient HTTP failures are retried by middleware,
//! every other failure is returned as a [`RetrievalError`] for that day.

pub mod error;
pub mod response;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, instrument, warn};

use crate::config::PowerConfig;
use crate::error::ServiceError;
use crate::models::{DailySample, Location};

pub use error::RetrievalError;
pub use response::{PARAMETERS, PointResponse};

/// Source of one daily record per (location, date)
#[async_trait]
pub trait DailyRecordSource: Send + Sync {
    async fn fetch_day(
        &self,
        location: Location,
        date: NaiveDate,
    ) -> Result<DailySample, RetrievalError>;
}

/// HTTP client for the POWER daily point endpoint
#[derive(Clone)]
pub struct PowerClient {
    client: ClientWithMiddleware,
    base_url: String,
    community: String,
}

impl PowerClient {
    pub fn new(config: &PowerConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-probability/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            community: config.community.clone(),
        })
    }

    /// URL requesting all parameters for exactly one day
    #[must_use]
    pub fn daily_point_url(&self, location: Location, date: NaiveDate) -> String {
        let day = date.format(response::DATE_FORMAT);
        format!(
            "{}/temporal/daily/point?parameters={}&start={day}&end={day}&latitude={}&longitude={}&community={}&format=JSON",
            self.base_url,
            PARAMETERS.join(","),
            location.latitude,
            location.longitude,
            self.community,
        )
    }
}

#[async_trait]
impl DailyRecordSource for PowerClient {
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    async fn fetch_day(
        &self,
        location: Location,
        date: NaiveDate,
    ) -> Result<DailySample, RetrievalError> {
        let url = self.daily_point_url(location, date);
        debug!("POWER request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| RetrievalError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::HttpStatus { url, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| RetrievalError::Body {
                url: url.clone(),
                source,
            })?;
        let sample = PointResponse::from_body(&body)?.daily_sample(date)?;

        let duration = start_time.elapsed();
        debug!("Retrieved {} in {:.3}s", date, duration.as_secs_f64());
        if duration.as_secs() > 5 {
            warn!("Slow POWER response: {:.3}s", duration.as_secs_f64());
        }

        Ok(sample)
    }
}
