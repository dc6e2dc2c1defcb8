use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::types::db::{audit_log, user};
use crate::types::internal::audit::AuditLogEntry;

#[derive(FromQueryResult)]
struct AuditLogRow {
    id: i64,
    user_id: String,
    username: String,
    action: String,
    created_at: i64,
}

impl From<AuditLogRow> for AuditLogEntry {
    fn from(row: AuditLogRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            action: row.action,
            created_at: row.created_at,
        }
    }
}

/// Append-only storage for the audit trail
pub struct AuditStore {}

impl AuditStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Append one entry and return its id
    pub async fn append(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        action: &str,
    ) -> Result<i64, InternalError> {
        let entry = audit_log::ActiveModel {
            id: NotSet,
            user_id: Set(user_id.to_owned()),
            action: Set(action.to_owned()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_audit_log", e))?;

        Ok(entry.id)
    }

    /// Newest entries first, ties broken by id, each joined with the acting username
    pub async fn recent(
        &self,
        conn: &impl ConnectionTrait,
        limit: u64,
        user_id: Option<&str>,
    ) -> Result<Vec<AuditLogEntry>, InternalError> {
        let mut query = audit_log::Entity::find()
            .select_only()
            .column(audit_log::Column::Id)
            .column(audit_log::Column::UserId)
            .column_as(user::Column::Username, "username")
            .column(audit_log::Column::Action)
            .column(audit_log::Column::CreatedAt)
            .join(JoinType::InnerJoin, audit_log::Relation::User.def());

        if let Some(user_id) = user_id {
            query = query.filter(audit_log::Column::UserId.eq(user_id));
        }

        let rows = query
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .into_model::<AuditLogRow>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("query_audit_logs", e))?;

        Ok(rows.into_iter().map(AuditLogEntry::from).collect())
    }
}

impl Default for AuditStore {
    fn default() -> Self {
        Self::new()
    }
}
