//! Crisis escalation: the pure alert/self-check policy and the
//! storage-backed service that records detections.

mod policy;
mod service;

pub use policy::CrisisEscalationPolicy;
pub use service::{CRISIS_EVENT_NAMESPACE, CrisisService};
