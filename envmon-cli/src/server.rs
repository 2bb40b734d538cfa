//! HTTP API serving the weather envelope.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use envmon_core::{Config, ErrorEnvelope, FETCH_FAILED, WeatherService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

/// GET /weather - fetch upstream, record, return envelope
async fn weather(State(state): State<AppState>) -> Response {
    match state.service.handle().await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "API error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope {
                    error: FETCH_FAILED.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(service: Arc<WeatherService>) -> Router {
    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/weather", get(weather))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(WeatherService::from_config(config)?);
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(
        addr = %config.server.bind,
        location = %config.location.name,
        capacity = config.history.capacity,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
    }
}
