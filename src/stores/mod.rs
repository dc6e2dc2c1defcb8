// Stores layer - Data access, one struct per table group
pub mod audit_store;
pub mod authorization_store;
pub mod credential_store;
pub mod session_store;

pub use audit_store::AuditStore;
pub use authorization_store::AuthorizationStore;
pub use credential_store::CredentialStore;
pub use session_store::SessionStore;
