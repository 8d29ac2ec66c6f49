//! Daily samples, the merged sample set and per-year retrieval outcomes

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::power::RetrievalError;

/// Calendar day-of-year anchor (`MMDD`) used to pick the same date across years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Build from a month and day. The pair must exist in at least one year, so
    /// `02-29` is accepted while `02-30` is not.
    pub fn new(month: u32, day: u32) -> Result<Self, ServiceError> {
        // 2000 is a leap year, so every day that exists in some year exists in it
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or_else(|| {
                ServiceError::validation(format!(
                    "Invalid calendar day {month:02}{day:02}: no such month/day"
                ))
            })
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The concrete date in `year`, or `None` when the day does not occur that year.
    #[must_use]
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::validation(format!(
                "Invalid month-day '{s}': expected 4 digits MMDD"
            )));
        }
        let month = s[..2].parse().map_err(|_| {
            ServiceError::validation(format!("Invalid month in '{s}'"))
        })?;
        let day = s[2..].parse().map_err(|_| {
            ServiceError::validation(format!("Invalid day in '{s}'"))
        })?;
        Self::new(month, day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.month, self.day)
    }
}

/// One observation for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    /// Temperature at 2 m in Celsius
    pub temperature: f64,
    /// Wind speed at 2 m in m/s
    pub wind_speed: f64,
    /// Corrected total precipitation in mm/day
    pub precipitation: f64,
}

/// Date-ordered set of daily samples with at most one sample per year.
///
/// Built once from the collected samples and read-only afterwards. An empty set
/// is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<DailySample>,
}

impl SampleSet {
    /// Sort by date and keep the earliest-dated sample of each year.
    #[must_use]
    pub fn new(mut samples: Vec<DailySample>) -> Self {
        samples.sort_by_key(|s| s.date);
        samples.dedup_by_key(|s| s.date.year());
        Self { samples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temperature).collect()
    }

    #[must_use]
    pub fn wind_speeds(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind_speed).collect()
    }

    #[must_use]
    pub fn precipitation(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.precipitation).collect()
    }

    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.samples.iter().map(|s| s.date.year()).collect()
    }
}

/// Result of one attempted year
#[derive(Debug)]
pub enum RetrievalOutcome {
    Retrieved(DailySample),
    Failed { year: i32, reason: RetrievalError },
}

impl RetrievalOutcome {
    #[must_use]
    pub fn year(&self) -> i32 {
        match self {
            RetrievalOutcome::Retrieved(sample) => sample.date.year(),
            RetrievalOutcome::Failed { year, .. } => *year,
        }
    }

    #[must_use]
    pub fn sample(&self) -> Option<&DailySample> {
        match self {
            RetrievalOutcome::Retrieved(sample) => Some(sample),
            RetrievalOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, RetrievalOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample(year: i32, temperature: f64) -> DailySample {
        DailySample {
            date: NaiveDate::from_ymd_opt(year, 7, 15).unwrap(),
            temperature,
            wind_speed: 3.0,
            precipitation: 0.5,
        }
    }

    #[rstest]
    #[case("0715", 7, 15)]
    #[case("0101", 1, 1)]
    #[case("1231", 12, 31)]
    #[case("0229", 2, 29)]
    fn test_month_day_parses(#[case] input: &str, #[case] month: u32, #[case] day: u32) {
        let md: MonthDay = input.parse().unwrap();
        assert_eq!(md.month(), month);
        assert_eq!(md.day(), day);
        assert_eq!(md.to_string(), input);
    }

    #[rstest]
    #[case("1301")]
    #[case("0230")]
    #[case("0000")]
    #[case("715")]
    #[case("07-1")]
    #[case("07155")]
    fn test_month_day_rejects(#[case] input: &str) {
        assert!(input.parse::<MonthDay>().is_err());
    }

    #[test]
    fn test_leap_day_only_exists_in_leap_years() {
        let md = MonthDay::new(2, 29).unwrap();
        assert!(md.in_year(2020).is_some());
        assert!(md.in_year(2021).is_none());
        assert!(md.in_year(1900).is_none());
        assert!(md.in_year(2000).is_some());
    }

    #[test]
    fn test_sample_set_orders_by_date() {
        let set = SampleSet::new(vec![sample(2020, 1.0), sample(2014, 2.0), sample(2017, 3.0)]);
        assert_eq!(set.years(), vec![2014, 2017, 2020]);
        assert_eq!(set.temperatures(), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_sample_set_keeps_earliest_sample_per_year() {
        let mut other_day = sample(2015, 9.0);
        other_day.date = NaiveDate::from_ymd_opt(2015, 7, 16).unwrap();
        let set = SampleSet::new(vec![other_day, sample(2015, 1.0), sample(2016, 2.0)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.temperatures(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_sample_set() {
        let set = SampleSet::default();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.temperatures().is_empty());
    }

    #[test]
    fn test_outcome_year() {
        let ok = RetrievalOutcome::Retrieved(sample(2019, 20.0));
        assert_eq!(ok.year(), 2019);
        assert!(!ok.is_failure());

        let failed = RetrievalOutcome::Failed {
            year: 2018,
            reason: RetrievalError::MissingParameter {
                code: "T2M".to_string(),
            },
        };
        assert_eq!(failed.year(), 2018);
        assert!(failed.is_failure());
        assert!(failed.sample().is_none());
    }
}
