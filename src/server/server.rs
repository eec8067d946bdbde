use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::lead::LeadForwarder;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::sources::TokenProvider;
use crate::utils::constants::{HEALTH_ROUTE, LEAD_ROUTE, ROOT_ROUTE};

const BANNER: &str = "Yes, Tool is up and running...:)";

#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<LeadForwarder>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub async fn new(forwarder: LeadForwarder) -> Self {
        let metrics = get_metrics().await;
        Self {
            forwarder: Arc::new(forwarder),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }

    /// Wire the token provider and forwarder from validated configuration.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.settings.http_timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let tokens = TokenProvider::new(client.clone(), &config.provider).with_timeout(timeout);
        let forwarder =
            LeadForwarder::new(client, tokens, config.contacts_url()).with_timeout(timeout);
        Ok(Self::new(forwarder).await)
    }
}

pub fn router(settings: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .route(LEAD_ROUTE, post(push_lead))
        .route(HEALTH_ROUTE, get(health))
        .route(ROOT_ROUTE, get(banner))
        .merge(state.metrics_state.router(&settings.metrics))
        .layer(DefaultBodyLimit::max(settings.body_limit_bytes))
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves.
pub async fn start<F>(config: &ServiceConfig, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = get_metrics().await;
    let app = router(&config.settings, state);

    let bind_addr = format!("{}:{}", config.settings.server.host, config.settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("lead relay listening on {}", bind_addr);

    metrics.up.set(1);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed");
    metrics.up.set(0);
    served
}

async fn push_lead(State(state): State<AppState>, body: Bytes) -> Response {
    match state.forwarder.forward_json(&body).await {
        Ok(downstream) => Json(json!({
            "success": true,
            "genesysResponse": downstream,
        }))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn banner() -> &'static str {
    BANNER
}
