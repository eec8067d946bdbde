use serde::Serialize;

use crate::lead::model::LeadRecord;
use crate::utils::constants::{FORM_TYPE, UNKNOWN_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactEntry {
    pub data: ContactData,
}

/// Contact columns expected by the downstream contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ref_reason1: String,
    pub ref_reason2: String,
    pub notes: String,
    pub form_type: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
}

/// Shape one lead into the single-element contact array.
pub fn build_contact_payload(lead: &LeadRecord) -> Vec<ContactEntry> {
    vec![ContactEntry {
        data: ContactData {
            name: full_name(lead),
            email: or_empty(&lead.email),
            phone: or_empty(&lead.phone),
            ref_reason1: or_empty(&lead.dropdown1),
            ref_reason2: or_empty(&lead.dropdown2),
            notes: or_empty(&lead.message),
            form_type: FORM_TYPE.to_string(),
            source_url: or_empty(&lead.dropdown3),
        },
    }]
}

fn full_name(lead: &LeadRecord) -> String {
    let joined = format!("{} {}", or_empty(&lead.first_name), or_empty(&lead.last_name));
    match joined.trim() {
        "" => UNKNOWN_NAME.to_string(),
        name => name.to_string(),
    }
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
