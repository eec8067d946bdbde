use std::path::PathBuf;

use clap::Parser;

use crate::config::settings::LogFormat;
use crate::config::types::ConfigOverrides;
use crate::utils::logging::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Optional YAML config file
    #[arg(short, long, env = "CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "GENESYS_CLIENT_ID")]
    pub client_id: Option<String>,
    #[arg(long, env = "GENESYS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    #[arg(long, env = "GENESYS_REGION")]
    pub region: Option<String>,
    #[arg(long, env = "PROVIDER_DOMAIN")]
    pub provider_domain: Option<String>,
    #[arg(long, env = "CONTACT_LIST_ID")]
    pub contact_list_id: Option<String>,
    /// Minimum remaining lifetime for a cached token to be reused
    #[arg(long, env = "TOKEN_EXPIRY_BUFFER_SECONDS")]
    pub token_expiry_buffer_seconds: Option<u64>,
    #[arg(long, env = "HOST")]
    pub host: Option<String>,
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            region: self.region.clone(),
            provider_domain: self.provider_domain.clone(),
            contact_list_id: self.contact_list_id.clone(),
            token_expiry_buffer_seconds: self.token_expiry_buffer_seconds,
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.map(|level| level.as_filter().to_string()),
            log_format: self.log_format,
        }
    }
}
