use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::stores::AuditStore;
use crate::types::internal::audit::{AuditLogEntry, AuditOutcome, AuditQuery};

/// Best-effort writer and reader of the audit trail
///
/// A failed write is reported on the error log and in the returned `AuditOutcome`.
/// It never turns a committed mutation into a failure.
pub struct AuditLogger {
    db: DatabaseConnection,
    audit_store: Arc<AuditStore>,
    default_limit: u64,
    max_limit: u64,
}

impl AuditLogger {
    pub fn new(db: DatabaseConnection, audit_store: Arc<AuditStore>, default_limit: u64, max_limit: u64) -> Self {
        Self {
            db,
            audit_store,
            default_limit,
            max_limit,
        }
    }

    /// Append one entry for `user_id`
    pub async fn record(&self, user_id: &str, action: &str) -> AuditOutcome {
        match self.audit_store.append(&self.db, user_id, action).await {
            Ok(id) => {
                tracing::debug!("Audit entry {} recorded for user {}: {}", id, user_id, action);
                AuditOutcome::Recorded(id)
            }
            Err(e) => {
                tracing::error!("Failed to write audit entry for user {} ({}): {}", user_id, action, e);
                AuditOutcome::Failed(AuditError::WriteFailed(e.to_string()))
            }
        }
    }

    /// Newest entries first; limit defaults and is clamped to `1..=max_limit`
    pub async fn query(&self, query: AuditQuery) -> Result<Vec<AuditLogEntry>, InternalError> {
        let limit = self.effective_limit(query.limit);
        self.audit_store
            .recent(&self.db, limit, query.user_id.as_deref())
            .await
    }

    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_limit).clamp(1, self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};

    async fn logger() -> (DatabaseConnection, AuditLogger) {
        let db = setup_test_db().await;
        let logger = AuditLogger::new(db.clone(), Arc::new(AuditStore::new()), 100, 500);
        (db, logger)
    }

    #[tokio::test]
    async fn query_with_limit_two_returns_the_two_newest() {
        let (db, logger) = logger().await;
        let user_id = insert_test_user(&db, "ivy").await;
        for action in ["one", "two", "three"] {
            assert!(logger.record(&user_id, action).await.is_recorded());
        }

        let entries = logger.query(AuditQuery::latest(2)).await.unwrap();

        let actions: Vec<_> = entries.iter().map(|entry| entry.action.as_str()).collect();
        assert_eq!(actions, ["three", "two"]);
    }

    #[tokio::test]
    async fn write_failure_is_reported_not_raised() {
        let (_db, logger) = logger().await;

        let outcome = logger.record("no-such-user", "orphan").await;

        assert!(matches!(outcome, AuditOutcome::Failed(AuditError::WriteFailed(_))));
    }

    #[tokio::test]
    async fn query_filters_by_user() {
        let (db, logger) = logger().await;
        let jack = insert_test_user(&db, "jack").await;
        let kate = insert_test_user(&db, "kate").await;
        logger.record(&jack, "jack did it").await;
        logger.record(&kate, "kate did it").await;

        let entries = logger.query(AuditQuery::default().for_user(jack.clone())).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "jack");
    }

    #[tokio::test]
    async fn limits_are_defaulted_and_clamped() {
        let (_db, logger) = logger().await;

        assert_eq!(logger.effective_limit(None), 100);
        assert_eq!(logger.effective_limit(Some(0)), 1);
        assert_eq!(logger.effective_limit(Some(50)), 50);
        assert_eq!(logger.effective_limit(Some(10_000)), 500);
    }
}
