use std::time::Duration;

use http::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{body_to_json, DownstreamError, ForwardError};
use crate::helpers::time::get_instant;
use crate::lead::model::LeadRecord;
use crate::lead::payload::{build_contact_payload, ContactEntry};
use crate::observability::metrics::{
    get_metrics, OUTCOME_AUTH_ERROR, OUTCOME_DOWNSTREAM_ERROR, OUTCOME_SUCCESS,
    OUTCOME_VALIDATION_ERROR,
};
use crate::sources::{AccessTokenSource, TokenProvider};
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_SECS;

/// Validates a lead, shapes it and creates it as a contact downstream.
#[derive(Debug, Clone)]
pub struct LeadForwarder<S = TokenProvider> {
    client: Client,
    tokens: S,
    contacts_url: String,
    timeout: Duration,
}

impl<S: AccessTokenSource> LeadForwarder<S> {
    pub fn new(client: Client, tokens: S, contacts_url: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            contacts_url: contacts_url.into(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Decode a raw request body and forward it, recording the outcome.
    pub async fn forward_json(&self, body: &[u8]) -> Result<Value, ForwardError> {
        let metrics = get_metrics().await;
        let start = get_instant();

        let result = match LeadRecord::from_json(body) {
            Ok(lead) => self.forward(&lead).await,
            Err(err) => Err(err.into()),
        };

        metrics
            .lead_forward_duration
            .observe(start.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(_) => OUTCOME_SUCCESS,
            Err(ForwardError::Validation(_)) => OUTCOME_VALIDATION_ERROR,
            Err(ForwardError::Auth(_)) => OUTCOME_AUTH_ERROR,
            Err(ForwardError::Downstream(_)) => OUTCOME_DOWNSTREAM_ERROR,
        };
        metrics.lead_forwards.with_label_values(&[outcome]).inc();
        result
    }

    /// Validate, shape, take one token and create the contact.
    ///
    /// A token failure ends the request; nothing is sent downstream.
    pub async fn forward(&self, lead: &LeadRecord) -> Result<Value, ForwardError> {
        lead.validate()?;
        let payload = build_contact_payload(lead);
        let token = self.tokens.acquire_token().await?;

        Ok(self.create_contact(&token, &payload).await?)
    }

    async fn create_contact(
        &self,
        token: &str,
        payload: &[ContactEntry],
    ) -> Result<Value, DownstreamError> {
        debug!(
            "sending payload: {}",
            serde_json::to_string_pretty(payload).unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.contacts_url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                error!("contact request failed: {}", err);
                DownstreamError::Transport(err.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DownstreamError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!("contact endpoint error {}: {}", status, body);
            return Err(DownstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("contact created, status {}", status);
        Ok(body_to_json(&body))
    }
}
