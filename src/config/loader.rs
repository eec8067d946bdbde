use std::{fs, path::Path};

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::provider::{Credentials, ProviderConfig};
use crate::config::types::{ConfigOverrides, RawServiceConfig, ServiceConfig};
use crate::error::ConfigError;
use crate::utils::constants::{DEFAULT_PROVIDER_DOMAIN, DEFAULT_TOKEN_EXPIRY_BUFFER_SECS};

/// Load the optional YAML file, apply CLI/env overrides and validate.
pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ServiceConfig, ConfigError> {
    let raw = match path {
        Some(path) => file_to_raw_config(path)?,
        None => RawServiceConfig::default(),
    };
    build(raw, overrides)
}

pub fn file_to_raw_config(path: &Path) -> Result<RawServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_raw_config(&expand_env_vars(&content))
}

pub fn parse_raw_config(content: &str) -> Result<RawServiceConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RawServiceConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Merge overrides into the file config and check every required value once.
pub fn build(
    mut raw: RawServiceConfig,
    overrides: ConfigOverrides,
) -> Result<ServiceConfig, ConfigError> {
    let provider = &mut raw.provider;
    override_with(&mut provider.client_id, overrides.client_id);
    override_with(&mut provider.client_secret, overrides.client_secret);
    override_with(&mut provider.region, overrides.region);
    override_with(&mut provider.domain, overrides.provider_domain);
    override_with(
        &mut provider.token_expiry_buffer_seconds,
        overrides.token_expiry_buffer_seconds,
    );
    override_with(&mut raw.contact_list_id, overrides.contact_list_id);
    if let Some(host) = overrides.host {
        raw.settings.server.host = host;
    }
    if let Some(port) = overrides.port {
        raw.settings.server.port = port;
    }
    if let Some(level) = overrides.log_level {
        raw.settings.logging.level = level;
    }
    if let Some(format) = overrides.log_format {
        raw.settings.logging.format = format;
    }

    let mut missing = Vec::new();
    let client_id = required(raw.provider.client_id, "provider.client_id", &mut missing);
    let client_secret = required(raw.provider.client_secret, "provider.client_secret", &mut missing);
    let region = required(raw.provider.region, "provider.region", &mut missing);
    let contact_list_id = required(raw.contact_list_id, "contact_list_id", &mut missing);

    if !missing.is_empty() {
        return Err(ConfigError::MissingValues(missing));
    }
    debug!("configuration validated");

    Ok(ServiceConfig {
        settings: raw.settings,
        provider: ProviderConfig {
            credentials: Credentials::new(client_id, client_secret, region),
            domain: non_empty(raw.provider.domain)
                .unwrap_or_else(|| DEFAULT_PROVIDER_DOMAIN.to_string()),
            token_expiry_buffer_seconds: raw
                .provider
                .token_expiry_buffer_seconds
                .unwrap_or(DEFAULT_TOKEN_EXPIRY_BUFFER_SECS),
            login_base_url: non_empty(raw.provider.login_base_url),
            api_base_url: non_empty(raw.provider.api_base_url),
        },
        contact_list_id,
    })
}

fn override_with<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match non_empty(value) {
        Some(v) => v,
        None => {
            missing.push(key);
            String::new()
        }
    }
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> String {
    let re = env_var_pattern();
    re.replace_all(input, |caps: &Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env var pattern is a valid regex")
    })
}
