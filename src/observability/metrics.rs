use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_VALIDATION_ERROR: &str = "validation_error";
pub const OUTCOME_AUTH_ERROR: &str = "auth_error";
pub const OUTCOME_DOWNSTREAM_ERROR: &str = "downstream_error";

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process metrics.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token provider metrics
    pub token_cache_hits: IntCounter,
    pub token_exchanges: IntCounterVec,
    pub token_exchange_duration: Histogram,
    pub token_expiry_unix: IntGauge,

    // Lead forwarding metrics
    pub lead_forwards: IntCounterVec,
    pub lead_forward_duration: Histogram,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("leadrelay".into()), None)
            .expect("metrics registry prefix is valid");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token provider
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from cache without an exchange").expect("metric"),
            token_exchanges: IntCounterVec::new(Opts::new("token_exchanges_total", "Client-credentials exchanges by outcome"), &["outcome"]).expect("metric"),
            token_exchange_duration: Histogram::with_opts(HistogramOpts::new("token_exchange_duration_seconds", "Token exchange duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])).expect("metric"),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry timestamp of the cached token").expect("metric"),

            // Leads
            lead_forwards: IntCounterVec::new(Opts::new("lead_forwards_total", "Forwarded leads by outcome"), &["outcome"]).expect("metric"),
            lead_forward_duration: Histogram::with_opts(HistogramOpts::new("lead_forward_duration_seconds", "End-to-end lead forwarding duration").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0])).expect("metric"),

            up: IntGauge::new("up", "1 if service is serving").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.token_cache_hits.clone()),
            Box::new(metrics.token_exchanges.clone()),
            Box::new(metrics.token_exchange_duration.clone()),
            Box::new(metrics.token_expiry_unix.clone()),
            Box::new(metrics.lead_forwards.clone()),
            Box::new(metrics.lead_forward_duration.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric registered once");
        }

        metrics
    }
}
