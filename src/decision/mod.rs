//! Capture acceptance decisions.

mod policy;
mod types;

pub use policy::DecisionPolicy;
pub use types::{DecisionResult, RejectReason};
