//! Error types and handling for the weather probability service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the service outside of per-year retrieval
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, reported back to the caller
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl ServiceError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to at the request boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            ServiceError::Validation { message } => message.clone(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if !matches!(self, ServiceError::Validation { .. }) {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(json!({ "error": self.user_message() }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ServiceError::config("missing base url");
        assert!(matches!(config_err, ServiceError::Config { .. }));

        let validation_err = ServiceError::validation("invalid coordinates");
        assert!(matches!(validation_err, ServiceError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = ServiceError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        // validation messages go back to the caller verbatim
        let validation_err = ServiceError::validation("Missing required fields: latitude");
        assert_eq!(
            validation_err.user_message(),
            "Missing required fields: latitude"
        );

        // internal details stay out of the response
        let config_err = ServiceError::config("WXPROB_POWER__BASE_URL is empty");
        assert!(!config_err.user_message().contains("WXPROB"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::config("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
