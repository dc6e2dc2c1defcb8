pub mod action_outcome;
pub mod audit;
pub mod audit_intent;
pub mod auth;
pub mod context;
pub mod rbac;
pub mod user;

pub use action_outcome::ActionOutcome;
pub use audit_intent::AuditIntent;
