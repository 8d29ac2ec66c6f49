use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, AppState};
use crate::config::{ServerConfig, ServiceConfig};
use crate::service::ProbabilityService;

/// Router with CORS, body-size and timeout layers applied
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(state)
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds.into(),
        )))
        .layer(cors)
}

pub async fn run(config: ServiceConfig) -> Result<()> {
    let service = ProbabilityService::with_power_client(&config)?;
    let app = app(AppState::new(service), &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Web server failed")?;
    Ok(())
}
