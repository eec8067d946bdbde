//! Prometheus text exposition for the relay's registry.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::error;

use crate::config::settings::MetricsConfig;
use crate::server::server::AppState;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Clone)]
pub struct MetricsState {
    pub registry: Arc<Registry>,
}

impl MetricsState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Empty unless metrics are enabled, so a disabled path answers 404.
    pub fn router(&self, metrics: &MetricsConfig) -> Router<AppState> {
        if !metrics.is_enabled {
            return Router::new();
        }
        Router::new().route(&metrics.path, get(render_metrics))
    }
}

/// Encode every metric family in `registry` in the text format.
pub fn encode_registry(registry: &Registry) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match encode_registry(&state.metrics_state.registry) {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!("failed to encode relay metrics: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
