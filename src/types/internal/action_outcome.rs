use super::audit_intent::AuditIntent;

/// Value produced by a mutation plus the audit entry it asks for
///
/// `audit` is `None` when the mutation changed nothing, in which case nothing is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome<T> {
    pub value: T,
    pub audit: Option<AuditIntent>,
}

impl<T> ActionOutcome<T> {
    pub fn new(value: T, audit: AuditIntent) -> Self {
        Self {
            value,
            audit: Some(audit),
        }
    }

    pub fn unchanged(value: T) -> Self {
        Self { value, audit: None }
    }
}
