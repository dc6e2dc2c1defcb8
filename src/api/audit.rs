use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers;
use crate::app_data::AppData;
use crate::errors::AdminError;
use crate::types::dto::audit::{AuditLogEntryResponse, AuditLogListResponse};
use crate::types::internal::audit::AuditQuery;

/// Entries shown when the caller does not ask for a specific number
pub const AUDIT_VIEW_DEFAULT_LIMIT: u64 = 200;

/// Audit log viewer
pub struct AuditApi {
    app_data: Arc<AppData>,
}

impl AuditApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }
}

#[derive(Tags)]
enum AuditTags {
    /// Audit log
    Audit,
}

#[OpenApi]
impl AuditApi {
    /// Most recent audit entries, newest first
    ///
    /// Requires the `read` permission.
    #[oai(path = "/audit-logs", method = "get", tag = "AuditTags::Audit")]
    async fn list(
        &self,
        req: &Request,
        limit: Query<Option<u64>>,
        user_id: Query<Option<String>>,
    ) -> Result<Json<AuditLogListResponse>, AdminError> {
        let ctx = helpers::request_context(req, &self.app_data.session_provider).await;
        let audit_logger = self.app_data.audit_logger.clone();
        let query = AuditQuery {
            limit: Some(limit.0.unwrap_or(AUDIT_VIEW_DEFAULT_LIMIT)),
            user_id: user_id.0,
        };

        self.app_data
            .gate
            .chain()
            .require_permission("read")
            .run(&ctx, |_| async move {
                let entries = audit_logger.query(query).await?;
                let entries: Vec<AuditLogEntryResponse> = entries.into_iter().map(Into::into).collect();

                Ok::<_, AdminError>(Json(AuditLogListResponse {
                    count: entries.len() as u64,
                    entries,
                }))
            })
            .await
            .map_err(AdminError::from_rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_app_data};

    fn request(token: Option<&str>) -> Request {
        let builder = Request::builder().uri(poem::http::Uri::from_static("/api/audit-logs"));
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)).finish(),
            None => builder.finish(),
        }
    }

    #[tokio::test]
    async fn reader_sees_newest_first_with_limit() {
        let app_data = setup_test_app_data().await;
        let user_id = create_test_user(&app_data, "ivy", "password1").await;
        app_data.role_admin.assign_role("ivy", "user").await.unwrap();
        for action in ["one", "two", "three"] {
            app_data.audit_logger.record(&user_id, action).await;
        }
        let login = app_data.session_provider.authenticate("ivy", "password1").await.unwrap();
        let api = AuditApi::new(app_data);

        let response = api
            .list(&request(Some(&login.token)), Query(Some(2)), Query(None))
            .await
            .unwrap();

        let actions: Vec<&str> = response.entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["three", "two"]);
        assert_eq!(response.count, 2);
        assert_eq!(response.entries[0].username, "ivy");
    }

    #[tokio::test]
    async fn user_without_read_is_forbidden() {
        let app_data = setup_test_app_data().await;
        create_test_user(&app_data, "jack", "password1").await;
        let login = app_data.session_provider.authenticate("jack", "password1").await.unwrap();
        let api = AuditApi::new(app_data);

        let result = api.list(&request(Some(&login.token)), Query(None), Query(None)).await;

        assert!(matches!(result, Err(AdminError::Forbidden(_))));
    }

    #[tokio::test]
    async fn anonymous_is_sent_to_login() {
        let app_data = setup_test_app_data().await;
        let api = AuditApi::new(app_data);

        let result = api.list(&request(None), Query(None), Query(None)).await;

        assert!(matches!(result, Err(AdminError::Unauthenticated(_))));
    }
}
