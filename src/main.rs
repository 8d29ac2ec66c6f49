use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use weather_probability::{ServiceConfig, config::LoggingConfig, web};

fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // optional config file path as the only argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServiceConfig::load_from_path(config_path)?;
    init_tracing(&config.logging);

    tracing::info!(
        "Starting weather-probability {} (years {}-{}, POWER at {})",
        weather_probability::VERSION,
        config.history.start_year,
        config.history.end_year,
        config.power.base_url
    );

    web::run(config).await
}
