use std::fmt;

use serde::Deserialize;

use crate::utils::constants::{DEFAULT_PROVIDER_DOMAIN, DEFAULT_TOKEN_EXPIRY_BUFFER_SECS};

/// Provider block as written in the config file, every value optional
/// until validation.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawProviderConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub region: Option<String>,
    pub domain: Option<String>,
    pub token_expiry_buffer_seconds: Option<u64>,
    pub login_base_url: Option<String>,
    pub api_base_url: Option<String>,
}

/// Client-credentials pair plus the region that selects the provider hosts.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub region: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            region: region.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// ================================
/// Validated provider configuration
/// ================================
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub credentials: Credentials,
    pub domain: String,
    pub token_expiry_buffer_seconds: u64,
    pub login_base_url: Option<String>,
    pub api_base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            domain: DEFAULT_PROVIDER_DOMAIN.to_string(),
            token_expiry_buffer_seconds: DEFAULT_TOKEN_EXPIRY_BUFFER_SECS,
            login_base_url: None,
            api_base_url: None,
        }
    }

    /// `https://login.{region}.{domain}` unless overridden
    pub fn login_base_url(&self) -> String {
        self.login_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://login.{}.{}", self.credentials.region, self.domain))
    }

    /// `https://api.{region}.{domain}` unless overridden
    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://api.{}.{}", self.credentials.region, self.domain))
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.login_base_url())
    }

    pub fn contacts_url(&self, contact_list_id: &str) -> String {
        format!(
            "{}/api/v2/outbound/contactlists/{}/contacts",
            self.api_base_url(),
            contact_list_id
        )
    }
}
