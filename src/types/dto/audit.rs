use poem_openapi::Object;

use crate::types::internal::audit::AuditLogEntry;

#[derive(Object, Debug)]
pub struct AuditLogEntryResponse {
    pub id: i64,
    pub user_id: String,
    pub username: String,
    pub action: String,

    /// Unix timestamp
    pub created_at: i64,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            username: entry.username,
            action: entry.action,
            created_at: entry.created_at,
        }
    }
}

/// Audit entries, newest first
#[derive(Object, Debug)]
pub struct AuditLogListResponse {
    pub entries: Vec<AuditLogEntryResponse>,
    pub count: u64,
}
