use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers;
use crate::app_data::AppData;
use crate::errors::AdminError;
use crate::types::dto::admin::RoleChangeResponse;
use crate::types::internal::ActionOutcome;
use crate::types::internal::rbac::{AssignOutcome, RemoveOutcome};

/// Role assignment endpoints, restricted to the `admin` role
pub struct AdminApi {
    app_data: Arc<AppData>,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Role management
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Give a role to a user
    #[oai(path = "/users/:username/roles/:role", method = "post", tag = "AdminTags::Admin")]
    async fn assign_role(
        &self,
        req: &Request,
        username: Path<String>,
        role: Path<String>,
    ) -> Result<Json<RoleChangeResponse>, AdminError> {
        let ctx = helpers::request_context(req, &self.app_data.session_provider).await;
        let role_admin = self.app_data.role_admin.clone();
        let (username, role) = (username.0, role.0);

        self.app_data
            .gate
            .chain()
            .require_role("admin")
            .run_mutation(&ctx, &self.app_data.audit_logger, |_| async move {
                let outcome = role_admin
                    .assign_role_audited(&username, &role)
                    .await
                    .map_err(AdminError::from_internal_error)?;

                let response = match outcome.value {
                    AssignOutcome::Assigned => RoleChangeResponse {
                        changed: true,
                        message: format!("Successfully assigned role '{}' to user '{}'.", role, username),
                    },
                    AssignOutcome::AlreadyAssigned => RoleChangeResponse {
                        changed: false,
                        message: format!("User '{}' already has role '{}'.", username, role),
                    },
                };
                Ok::<_, AdminError>(ActionOutcome {
                    value: Json(response),
                    audit: outcome.audit,
                })
            })
            .await
            .map_err(AdminError::from_rejection)
    }

    /// Take a role away from a user
    #[oai(path = "/users/:username/roles/:role", method = "delete", tag = "AdminTags::Admin")]
    async fn remove_role(
        &self,
        req: &Request,
        username: Path<String>,
        role: Path<String>,
    ) -> Result<Json<RoleChangeResponse>, AdminError> {
        let ctx = helpers::request_context(req, &self.app_data.session_provider).await;
        let role_admin = self.app_data.role_admin.clone();
        let (username, role) = (username.0, role.0);

        self.app_data
            .gate
            .chain()
            .require_role("admin")
            .run_mutation(&ctx, &self.app_data.audit_logger, |_| async move {
                let outcome = role_admin
                    .remove_role_audited(&username, &role)
                    .await
                    .map_err(AdminError::from_internal_error)?;

                let response = match outcome.value {
                    RemoveOutcome::Removed => RoleChangeResponse {
                        changed: true,
                        message: format!("Successfully removed role '{}' from user '{}'.", role, username),
                    },
                    RemoveOutcome::NotAssigned => RoleChangeResponse {
                        changed: false,
                        message: format!("User '{}' does not have role '{}'.", username, role),
                    },
                };
                Ok::<_, AdminError>(ActionOutcome {
                    value: Json(response),
                    audit: outcome.audit,
                })
            })
            .await
            .map_err(AdminError::from_rejection)
    }
}
