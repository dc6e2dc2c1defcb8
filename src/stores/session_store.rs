use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::types::db::session;

/// Login history. Rows are appended on login and never touched again.
pub struct SessionStore {}

impl SessionStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Record a new session for the user and return its id
    pub async fn start_session(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<session::Model, InternalError> {
        session::ActiveModel {
            id: NotSet,
            user_id: Set(user_id.to_owned()),
            started_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_session", e))
    }

    /// Sessions of one user, newest first
    pub async fn sessions_of(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Vec<session::Model>, InternalError> {
        session::Entity::find()
            .filter(session::Column::UserId.eq(user_id))
            .order_by_desc(session::Column::StartedAt)
            .order_by_desc(session::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("sessions_of", e))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
