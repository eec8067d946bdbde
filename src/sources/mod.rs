//! Token sources: where bearer tokens for the downstream API come from.

pub mod fetch;
pub mod oauth2;

pub use fetch::AccessTokenSource;
pub use oauth2::TokenProvider;
