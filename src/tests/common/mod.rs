// src/tests/common/mod.rs
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use httpmock::MockServer;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::config::provider::{Credentials, ProviderConfig};
use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::sources::TokenProvider;

pub const CLIENT_ID: &str = "relay-client";
pub const CLIENT_SECRET: &str = "relay-secret";
/// base64("relay-client:relay-secret")
pub const BASIC_AUTH: &str = "Basic cmVsYXktY2xpZW50OnJlbGF5LXNlY3JldA==";
pub const CONTACT_LIST_ID: &str = "list-42";
pub const TOKEN_PATH: &str = "/oauth/token";
pub const CONTACTS_PATH: &str = "/api/v2/outbound/contactlists/list-42/contacts";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn provider_config(login: &MockServer, api: &MockServer, buffer_seconds: u64) -> ProviderConfig {
    let mut provider = ProviderConfig::new(Credentials::new(CLIENT_ID, CLIENT_SECRET, "test"));
    provider.login_base_url = Some(login.base_url());
    provider.api_base_url = Some(api.base_url());
    provider.token_expiry_buffer_seconds = buffer_seconds;
    provider
}

pub fn token_provider(login: &MockServer, buffer_seconds: u64) -> TokenProvider {
    TokenProvider::new(build_reqwest_client(), &provider_config(login, login, buffer_seconds))
}

pub fn service_config(login: &MockServer, api: &MockServer) -> ServiceConfig {
    ServiceConfig {
        settings: SettingsConfig::default(),
        provider: provider_config(login, api, 30),
        contact_list_id: CONTACT_LIST_ID.to_string(),
    }
}
