//! Shared constants and defaults

pub const DEFAULT_TOKEN_EXPIRY_BUFFER_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PROVIDER_DOMAIN: &str = "pure.cloud";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 500 * 1024;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

pub const CLIENT_CREDENTIALS_BODY: &str = "grant_type=client_credentials";
pub const FORM_TYPE: &str = "Chatbot Form Fill";
pub const UNKNOWN_NAME: &str = "Unknown";

// Routes
pub const LEAD_ROUTE: &str = "/push-to-genesys";
pub const HEALTH_ROUTE: &str = "/health";
pub const ROOT_ROUTE: &str = "/";
