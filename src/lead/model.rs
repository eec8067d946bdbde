use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Lead-capture form submission. Every field may be absent, `null` or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LeadRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dropdown1: Option<String>,
    #[serde(default)]
    pub dropdown2: Option<String>,
    #[serde(default)]
    pub dropdown3: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LeadRecord {
    /// Decode a request body. Only a JSON object is a lead; schema checks
    /// are left to [`LeadRecord::validate`].
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| ValidationError::new(format!("invalid lead payload: {}", err)))?;
        if !value.is_object() {
            return Err(ValidationError::new("\"value\" must be of type object"));
        }
        serde_json::from_value(value)
            .map_err(|err| ValidationError::new(format!("invalid lead payload: {}", err)))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() && !is_valid_email(email) => Err(
                ValidationError::new("\"email\" must be a valid email"),
            ),
            _ => Ok(()),
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
        })
        .is_match(email)
}
