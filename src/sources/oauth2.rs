//! Client-credentials token provider.
//!
//! Serves the cached bearer token while more than `buffer_seconds` of its
//! lifetime remain, otherwise exchanges the configured credentials for a new
//! one. Refreshes are serialized behind one async mutex, so concurrent callers
//! that find the cache stale trigger a single exchange and share its result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::token::Token;
use crate::cache::token_cache::TokenCache;
use crate::config::provider::{Credentials, ProviderConfig};
use crate::error::AuthError;
use crate::helpers::time::{get_instant, now_u64};
use crate::observability::metrics::{get_metrics, OUTCOME_AUTH_ERROR, OUTCOME_SUCCESS};
use crate::parser::token_response::parse_token_response;
use crate::sources::fetch::AccessTokenSource;
use crate::utils::constants::{CLIENT_CREDENTIALS_BODY, DEFAULT_HTTP_TIMEOUT_SECS};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct TokenProvider {
    client: Client,
    token_url: Arc<str>,
    basic_auth: Arc<str>,
    buffer_seconds: u64,
    timeout: Duration,
    cache: TokenCache,
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenProvider {
    pub fn new(client: Client, provider: &ProviderConfig) -> Self {
        Self::with_cache(client, provider, TokenCache::new())
    }

    /// Build around an existing cache slot.
    pub fn with_cache(client: Client, provider: &ProviderConfig, cache: TokenCache) -> Self {
        Self {
            client,
            token_url: provider.token_url().into(),
            basic_auth: basic_authorization(&provider.credentials).into(),
            buffer_seconds: provider.token_expiry_buffer_seconds,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn buffer_seconds(&self) -> u64 {
        self.buffer_seconds
    }

    /// Return a token with more than `buffer_seconds` of validity left,
    /// exchanging credentials when the cached one does not qualify.
    pub async fn acquire_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached_fresh().await {
            return Ok(token.value);
        }

        // detached so that a caller dropping its request does not cancel an
        // exchange already in flight; the result still lands in the cache
        let provider = self.clone();
        run_detached(async move { provider.refresh().await }).await
    }

    async fn cached_fresh(&self) -> Option<Token> {
        let token = self.cache.get_fresh(now_u64(), self.buffer_seconds).await?;
        get_metrics().await.token_cache_hits.inc();
        debug!("token cache hit, expires at {}", token.exp_unix_ts);
        Some(token)
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        // someone else may have refreshed while we waited for the lock
        if let Some(token) = self.cached_fresh().await {
            return Ok(token.value);
        }

        let token = self.exchange().await?;
        self.cache.set(token.clone()).await;
        get_metrics().await.token_expiry_unix.set(token.exp_unix_ts as i64);
        Ok(token.value)
    }

    /// One client-credentials exchange. Never touches the cache.
    ///
    /// A token whose `expires_in` does not exceed the expiry buffer could
    /// never be served and is rejected as malformed.
    pub async fn exchange(&self) -> Result<Token, AuthError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        info!("requesting access token from {}", self.token_url);

        let result = self.request_token().await;
        metrics
            .token_exchange_duration
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(token) => {
                metrics.token_exchanges.with_label_values(&[OUTCOME_SUCCESS]).inc();
                info!("access token issued, expires at {}", token.exp_unix_ts);
            }
            Err(err) => {
                metrics.token_exchanges.with_label_values(&[OUTCOME_AUTH_ERROR]).inc();
                error!("token error: {}", err);
            }
        }
        result
    }

    async fn request_token(&self) -> Result<Token, AuthError> {
        let response = self
            .client
            .post(&*self.token_url)
            .header(AUTHORIZATION, &*self.basic_auth)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(CLIENT_CREDENTIALS_BODY)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_token_response(&body)?;
        if parsed.expires_in <= self.buffer_seconds {
            warn!(
                "token lifetime {}s does not exceed the {}s expiry buffer",
                parsed.expires_in, self.buffer_seconds
            );
            return Err(AuthError::MalformedResponse(format!(
                "'expires_in' {} does not exceed the {}s expiry buffer",
                parsed.expires_in, self.buffer_seconds
            )));
        }
        Ok(Token::issued(parsed.access_token, now_u64(), parsed.expires_in))
    }
}

impl AccessTokenSource for TokenProvider {
    async fn acquire_token(&self) -> Result<String, AuthError> {
        TokenProvider::acquire_token(self).await
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("token_url", &self.token_url)
            .field("buffer_seconds", &self.buffer_seconds)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Run a refresh on its own task; a panicking task surfaces as a transport
/// failure.
async fn run_detached<F>(refresh: F) -> Result<String, AuthError>
where
    F: std::future::Future<Output = Result<String, AuthError>> + Send + 'static,
{
    tokio::spawn(refresh)
        .await
        .map_err(|err| AuthError::Transport(format!("token refresh task failed: {}", err)))?
}

/// `Basic base64(client_id:client_secret)`
pub fn basic_authorization(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

fn transport_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Transport(format!("timed out: {}", err))
    } else {
        AuthError::Transport(err.to_string())
    }
}
