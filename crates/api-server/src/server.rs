//! API server — HTTP router construction and startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pulse_core::config::AppConfig;
use pulse_journey::JourneyEngine;
use pulse_store::RecordStore;

use crate::journey_rest;
use crate::rest::{self, AppState};

/// Build the application router. Exposed separately from the server so
/// integration tests can drive it without binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Journey endpoints
        .route("/v1/journey", get(journey_rest::handle_list_journeys))
        .route("/v1/journey/analytics", get(journey_rest::handle_analytics))
        .route("/v1/journey/board", get(journey_rest::handle_board))
        .route("/v1/journey/:deal_id", get(journey_rest::handle_get_journey))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .route("/api-docs/openapi.json", get(rest::openapi_spec))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server.
pub struct ApiServer {
    config: AppConfig,
    store: Arc<RecordStore>,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: Arc<RecordStore>) -> Self {
        Self { config, store }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            store: self.store.clone(),
            engine: JourneyEngine::new(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
            default_page_size: self.config.api.default_page_size,
            max_page_size: self.config.api.max_page_size,
        }
    }

    /// Start the HTTP server; blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.app_state());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus metrics exporter on its own port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
