//! NASA POWER daily point response structures and sample extraction

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Deserialize;

use super::RetrievalError;
use crate::models::DailySample;

/// Temperature at 2 m (Celsius)
pub const TEMPERATURE: &str = "T2M";
/// Wind speed at 2 m (m/s)
pub const WIND_SPEED: &str = "WS2M";
/// Corrected total precipitation (mm/day)
pub const PRECIPITATION: &str = "PRECTOTCORR";

/// Parameter codes in request order
pub const PARAMETERS: [&str; 3] = [TEMPERATURE, WIND_SPEED, PRECIPITATION];

/// Value the provider reports when it has no data
pub const FILL_VALUE: f64 = -999.0;

/// Date key format used by the provider
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Daily point response. Only the parts the collector reads are modelled.
#[derive(Debug, Deserialize)]
pub struct PointResponse {
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub struct Properties {
    /// Parameter code to date key (`YYYYMMDD`) to value
    pub parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}

impl PointResponse {
    /// Parse a raw response body.
    pub fn from_body(body: &str) -> Result<Self, RetrievalError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Extract the sample for `date`. Any absent parameter or value fails the whole day.
    pub fn daily_sample(&self, date: NaiveDate) -> Result<DailySample, RetrievalError> {
        Ok(DailySample {
            date,
            temperature: self.value(TEMPERATURE, date)?,
            wind_speed: self.value(WIND_SPEED, date)?,
            precipitation: self.value(PRECIPITATION, date)?,
        })
    }

    fn value(&self, code: &str, date: NaiveDate) -> Result<f64, RetrievalError> {
        let series = self.properties.parameter.get(code).ok_or_else(|| {
            RetrievalError::MissingParameter {
                code: code.to_string(),
            }
        })?;

        let key = date.format(DATE_FORMAT).to_string();
        match series.get(&key).copied().flatten() {
            Some(value) if value.is_finite() && value != FILL_VALUE => Ok(value),
            _ => Err(RetrievalError::MissingValue {
                code: code.to_string(),
                date,
            }),
        }
    }
}
