pub mod advisory;
pub mod bounded;
pub mod workflow;

pub use advisory::{AdvisoryStore, DEFAULT_ADVISORY_CAPACITY};
pub use bounded::BoundedCache;
pub use workflow::{WorkflowState, WorkflowStore, DEFAULT_WORKFLOW_CAPACITY};
