use crate::{errors::InternalError, types::internal::ActionOutcome};

// Types layer - All data structures
pub mod db;
pub mod dto;
pub mod internal;

/// Result of a mutating operation that may ask for an audit entry
pub type ProviderResult<T> = Result<ActionOutcome<T>, InternalError>;

/// Argon2id PHC string as stored in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(pub String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
