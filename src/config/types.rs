use serde::Deserialize;

use crate::config::provider::{ProviderConfig, RawProviderConfig};
use crate::config::settings::{LogFormat, SettingsConfig};

/// ================================
/// Config file contents, before validation
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub provider: RawProviderConfig,
    pub contact_list_id: Option<String>,
}

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub provider: ProviderConfig,
    pub contact_list_id: String,
}

impl ServiceConfig {
    pub fn contacts_url(&self) -> String {
        self.provider.contacts_url(&self.contact_list_id)
    }
}

/// Values taken from CLI flags or the environment; each one, when set, wins
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub region: Option<String>,
    pub provider_domain: Option<String>,
    pub contact_list_id: Option<String>,
    pub token_expiry_buffer_seconds: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}
