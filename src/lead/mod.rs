pub mod forwarder;
pub mod model;
pub mod payload;

pub use forwarder::LeadForwarder;
pub use model::LeadRecord;
