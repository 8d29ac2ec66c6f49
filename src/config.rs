//! Configuration management for the weather probability service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ServiceError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Earliest year the POWER daily archive covers
pub const EARLIEST_DATA_YEAR: i32 = 1981;

/// Part of the request timeout kept back for estimating and writing the response
pub const RESPONSE_HEADROOM: Duration = Duration::from_secs(1);

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote data source settings
    #[serde(default)]
    pub power: PowerConfig,
    /// Historical year window
    #[serde(default)]
    pub history: HistoryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (`PORT` env var overrides)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for handling one request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// Maximum accepted request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// NASA POWER API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Base URL of the POWER API
    #[serde(default = "default_power_base_url")]
    pub base_url: String,
    /// User community identifier sent with every request
    #[serde(default = "default_power_community")]
    pub community: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_power_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    #[serde(default = "default_power_max_retries")]
    pub max_retries: u32,
    /// Years fetched concurrently for one request
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

/// Year window sampled for every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// First year, inclusive
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Last year, inclusive
    #[serde(default = "default_end_year")]
    pub end_year: i32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u32 {
    120
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_power_base_url() -> String {
    "https://power.larc.nasa.gov/api".to_string()
}

fn default_power_community() -> String {
    "AG".to_string()
}

fn default_power_timeout() -> u32 {
    30
}

fn default_power_max_retries() -> u32 {
    2
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_start_year() -> i32 {
    2013
}

fn default_end_year() -> i32 {
    2023
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            base_url: default_power_base_url(),
            community: default_power_community(),
            timeout_seconds: default_power_timeout(),
            max_retries: default_power_max_retries(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Time sample collection may take before the request timeout would cut it off
    #[must_use]
    pub fn collection_budget(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds)).saturating_sub(RESPONSE_HEADROOM)
    }
}

impl HistoryConfig {
    /// Years to sample, oldest first
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

impl ServiceConfig {
    /// Load configuration from `config_path`, or the default locations when `None`,
    /// then apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with WXPROB_ prefix, e.g. WXPROB_POWER__MAX_RETRIES
        builder = builder.add_source(
            Environment::with_prefix("WXPROB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Hosting platforms hand out the listen port through PORT
        let port = match std::env::var("PORT") {
            Ok(value) => Some(
                value
                    .parse::<u16>()
                    .with_context(|| format!("Invalid PORT value '{value}'"))?,
            ),
            Err(_) => None,
        };
        builder = builder
            .set_override_option("server.port", port.map(i64::from))
            .with_context(|| "Failed to apply PORT override")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ServiceConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-probability").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.power.base_url.is_empty() {
            self.power.base_url = default_power_base_url();
        }
        if self.power.community.is_empty() {
            self.power.community = default_power_community();
        }
        if self.power.timeout_seconds == 0 {
            self.power.timeout_seconds = default_power_timeout();
        }
        if self.power.max_concurrent_requests == 0 {
            self.power.max_concurrent_requests = default_max_concurrent_requests();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_history()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.power.timeout_seconds > 300 {
            return Err(
                ServiceError::config("POWER API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.power.max_retries > 10 {
            return Err(ServiceError::config("POWER API max retries cannot exceed 10").into());
        }

        if self.power.max_concurrent_requests > 32 {
            return Err(
                ServiceError::config("Concurrent POWER requests cannot exceed 32").into(),
            );
        }

        if self.server.request_timeout_seconds < 2 {
            return Err(
                ServiceError::config("Request timeout must be at least 2 seconds").into(),
            );
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(
                ServiceError::config("Request timeout cannot exceed 600 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate the historical year window
    fn validate_history(&self) -> Result<()> {
        let history = &self.history;
        if history.start_year > history.end_year {
            return Err(ServiceError::config(format!(
                "History start year {} is after end year {}",
                history.start_year, history.end_year
            ))
            .into());
        }

        if history.start_year < EARLIEST_DATA_YEAR {
            return Err(ServiceError::config(format!(
                "History cannot start before {EARLIEST_DATA_YEAR}"
            ))
            .into());
        }

        if history.end_year - history.start_year >= 100 {
            return Err(ServiceError::config("History window cannot exceed 100 years").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ServiceError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ServiceError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.power.base_url.starts_with("http://")
            && !self.power.base_url.starts_with("https://")
        {
            return Err(ServiceError::config(
                "POWER API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // loading reads process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.power.base_url, "https://power.larc.nasa.gov/api");
        assert_eq!(config.power.community, "AG");
        assert_eq!(config.power.timeout_seconds, 30);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.history.years().count(), 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ServiceConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ServiceConfig::default();
        config.power.timeout_seconds = 500; // Invalid - too high
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_reversed_history() {
        let mut config = ServiceConfig::default();
        config.history.start_year = 2020;
        config.history.end_year = 2010;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("after end year"));
    }

    #[test]
    fn test_config_validation_history_before_archive() {
        let mut config = ServiceConfig::default();
        config.history.start_year = 1950;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = ServiceConfig::default();
        config.power.base_url = String::new();
        config.power.max_concurrent_requests = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.power.base_url, "https://power.larc.nasa.gov/api");
        assert_eq!(config.power.max_concurrent_requests, 4);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[power]\nmax_retries = 0\ncommunity = \"RE\"\n\n[history]\nstart_year = 2000\nend_year = 2009"
        )
        .unwrap();

        let config = ServiceConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.power.max_retries, 0);
        assert_eq!(config.power.community, "RE");
        assert_eq!(config.history.years().count(), 10);
        // untouched sections keep their defaults
        assert_eq!(config.power.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[power]\nmax_concurrent_requests = 2").unwrap();

        unsafe {
            std::env::set_var("WXPROB_POWER__MAX_CONCURRENT_REQUESTS", "9");
            std::env::set_var("WXPROB_LOGGING__FORMAT", "json");
        }
        let config = ServiceConfig::load_from_path(Some(file.path().to_path_buf()));
        unsafe {
            std::env::remove_var("WXPROB_POWER__MAX_CONCURRENT_REQUESTS");
            std::env::remove_var("WXPROB_LOGGING__FORMAT");
        }

        let config = config.unwrap();
        assert_eq!(config.power.max_concurrent_requests, 9);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_port_variable_overrides_server_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = PathBuf::from("config/default.toml");

        unsafe { std::env::set_var("PORT", "8081") };
        let config = ServiceConfig::load_from_path(Some(path.clone()));
        unsafe { std::env::set_var("PORT", "not-a-port") };
        let invalid = ServiceConfig::load_from_path(Some(path));
        unsafe { std::env::remove_var("PORT") };

        assert_eq!(config.unwrap().server.port, 8081);
        assert!(invalid.unwrap_err().to_string().contains("Invalid PORT"));
    }

    #[test]
    fn test_request_timeout_lower_bound() {
        let mut config = ServiceConfig::default();
        config.server.request_timeout_seconds = 1;
        assert!(config.validate().is_err());

        config.server.request_timeout_seconds = 2;
        assert!(config.validate().is_ok());
        assert_eq!(config.server.collection_budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_shipped_default_file_matches_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = ServiceConfig::load_from_path(Some(PathBuf::from("config/default.toml")))
            .unwrap();
        let defaults = ServiceConfig::default();
        assert_eq!(config.power.base_url, defaults.power.base_url);
        assert_eq!(config.power.max_retries, defaults.power.max_retries);
        assert_eq!(config.history.years(), defaults.history.years());
        assert_eq!(config.server.max_body_bytes, defaults.server.max_body_bytes);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = ServiceConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weather-probability"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
