use crate::errors::internal::AuditError;

/// One audit-log row joined with the acting user's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: i64,
    pub user_id: String,
    pub username: String,
    pub action: String,
    pub created_at: i64,
}

/// Parameters for reading the audit log, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    /// Maximum number of entries; `None` falls back to the configured default
    pub limit: Option<u64>,

    /// Restrict to entries of one user
    pub user_id: Option<String>,
}

impl AuditQuery {
    pub fn latest(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            user_id: None,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Result of a best-effort audit write
///
/// A failed write is reported here and on the error log, never as an `Err`.
#[derive(Debug)]
pub enum AuditOutcome {
    Recorded(i64),
    Failed(AuditError),
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }
}
