use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Why one year's record could not be retrieved.
///
/// Every variant is recovered inside the collector; none aborts a request.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response payload")]
    Decode(#[from] serde_json::Error),

    #[error("Parameter '{code}' missing from response")]
    MissingParameter { code: String },

    #[error("No value for parameter '{code}' on {date}")]
    MissingValue { code: String, date: NaiveDate },

    #[error("Calendar day {month_day} does not exist in {year}")]
    InvalidDate { year: i32, month_day: String },

    #[error("Retrieval timed out after {after:?}")]
    Timeout { after: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cause() {
        let err = RetrievalError::MissingValue {
            code: "WS2M".to_string(),
            date: NaiveDate::from_ymd_opt(2016, 3, 1).unwrap(),
        };
        assert_eq!(err.to_string(), "No value for parameter 'WS2M' on 2016-03-01");

        let err = RetrievalError::InvalidDate {
            year: 2021,
            month_day: "0229".to_string(),
        };
        assert_eq!(err.to_string(), "Calendar day 0229 does not exist in 2021");
    }

    #[test]
    fn test_decode_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RetrievalError = json_err.into();
        assert!(matches!(err, RetrievalError::Decode(_)));
    }
}
