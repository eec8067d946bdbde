//! Error types and HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Startup configuration failures. The service does not start serving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingValues(Vec<&'static str>),

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config format: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Identity exchange failures. The token cache is never touched when one is
/// produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token endpoint responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("token request failed: {0}")]
    Transport(String),

    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            AuthError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Inbound lead record rejected by schema checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Contact-creation call failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DownstreamError {
    #[error("contact endpoint responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("contact request failed: {0}")]
    Transport(String),
}

/// Everything a single forwarded lead can fail with.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Downstream(#[from] DownstreamError),
}

impl ForwardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::Validation(_) => StatusCode::BAD_REQUEST,
            ForwardError::Auth(_) | ForwardError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// upstream status and body, when the failing peer answered at all
    fn upstream(&self) -> (Option<u16>, Option<&str>) {
        match self {
            ForwardError::Auth(AuthError::Status { status, body })
            | ForwardError::Downstream(DownstreamError::Status { status, body }) => {
                (Some(*status), Some(body.as_str()))
            }
            _ => (None, None),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ForwardError::Validation(err) => json!({ "success": false, "error": err.message }),
            _ => {
                let (status, body) = self.upstream();
                json!({
                    "success": false,
                    "error": {
                        "message": self.to_string(),
                        "status": status,
                        "data": body.map(body_to_json),
                    }
                })
            }
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

/// Upstream bodies are relayed as JSON when they parse, as a string otherwise.
pub fn body_to_json(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
