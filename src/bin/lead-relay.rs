use anyhow::Result;
use clap::Parser;
use lead_relay::config::cli::Args;
use lead_relay::config::loader;
use lead_relay::server::server::{self, AppState};
use lead_relay::utils::logging::init_logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args / env and load config
    // -------------------------------

    let args = Args::parse();
    let service_config = loader::load(args.config.as_deref(), args.overrides())?;
    init_logging(&service_config.settings.logging);

    info!(
        "provider region '{}', contact list '{}', token expiry buffer {}s",
        service_config.provider.credentials.region,
        service_config.contact_list_id,
        service_config.provider.token_expiry_buffer_seconds
    );

    // -------------------------------
    // 2. Token provider + lead forwarder
    // -------------------------------

    let state = AppState::from_config(&service_config).await?;

    // -------------------------------
    // 3. Serve until ctrl-c
    // -------------------------------

    server::start(&service_config, state, shutdown_signal()).await?;
    info!("lead relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down gracefully");
}
