/// Audit entry a mutation wants written once its change is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditIntent {
    pub action: String,
}

impl AuditIntent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    pub fn role_assigned(role: &str, username: &str) -> Self {
        Self::new(format!("Assigned role '{}' to user '{}'", role, username))
    }

    pub fn role_removed(role: &str, username: &str) -> Self {
        Self::new(format!("Removed role '{}' from user '{}'", role, username))
    }
}
