//! # Lead Relay
//!
//! Receives lead-capture submissions, validates them, obtains a bearer token
//! through the OAuth2 client-credentials grant and creates the lead as a
//! contact in a remote contact list.
//!
//! Modules:
//! - `config` — CLI/env/YAML configuration and validation
//! - `cache` — single-slot token cache
//! - `sources` — client-credentials token provider
//! - `parser` — token endpoint response parsing
//! - `lead` — lead schema, payload shaping and forwarding
//! - `server` — axum routes

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod lead;
pub mod observability;
pub mod parser;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::error::{AuthError, ConfigError, DownstreamError, ForwardError, ValidationError};
pub use crate::lead::{LeadForwarder, LeadRecord};
pub use crate::sources::{AccessTokenSource, TokenProvider};
