use std::collections::BTreeSet;
use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers;
use crate::app_data::AppData;
use crate::errors::AuthError;
use crate::providers::RegistrationRequest;
use crate::types::dto::auth::{
    LoginRequest, LogoutResponse, ProfileResponse, RegisterApiResponse, RegisterRequest, RegisterResponse,
    TokenResponse,
};

/// Permissions that together make a caller an administrator in the profile view
const ADMIN_PERMISSIONS: [&str; 4] = ["read", "create", "update", "delete"];

/// Authentication API endpoints
pub struct AuthApi {
    app_data: Arc<AppData>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let body = body.0;
        let username = body.username.trim().to_string();

        let user_id = self
            .app_data
            .user_provider
            .register(RegistrationRequest {
                username: body.username,
                email: body.email,
                password: body.password,
                confirm_password: body.confirm_password,
            })
            .await?;

        tracing::info!("Registered user {} ({})", username, user_id);

        Ok(RegisterApiResponse::Created(Json(RegisterResponse {
            user_id,
            username,
            message: "Registration successful! Please log in.".to_string(),
        })))
    }

    /// Login with username and password to receive a session token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let authenticated = self
            .app_data
            .session_provider
            .authenticate(body.username.trim(), &body.password)
            .await?;

        Ok(Json(TokenResponse {
            access_token: authenticated.token,
            token_type: "Bearer".to_string(),
            username: authenticated.identity.username,
            expires_in: self.app_data.token_provider.session_ttl_minutes() * 60,
        }))
    }

    /// End the caller's session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request) -> Result<Json<LogoutResponse>, AuthError> {
        let ctx = helpers::request_context(req, &self.app_data.session_provider).await;
        let sessions = self.app_data.session_provider.clone();

        self.app_data
            .gate
            .chain()
            .run(&ctx, |identity| async move {
                sessions.terminate(&identity).await;
                Ok(Json(LogoutResponse {
                    message: "You have been logged out.".to_string(),
                }))
            })
            .await
            .map_err(AuthError::from_rejection)
    }

    /// The caller's account with current roles and permissions
    #[oai(path = "/profile", method = "get", tag = "AuthTags::Authentication")]
    async fn profile(&self, req: &Request) -> Result<Json<ProfileResponse>, AuthError> {
        let ctx = helpers::request_context(req, &self.app_data.session_provider).await;
        let app_data = self.app_data.clone();
        let lookup_ctx = ctx.clone();

        self.app_data
            .gate
            .chain()
            .run(&ctx, |identity| async move {
                let user = app_data
                    .session_provider
                    .current_user(&lookup_ctx)
                    .await?
                    .ok_or_else(|| {
                        tracing::warn!("Session of user {} outlived the account", identity.user_id);
                        AuthError::unauthenticated(crate::gate::LOGIN_PATH.to_string(), None)
                    })?;

                let roles = app_data.authorization_provider.roles_of(&user.id).await?;
                let permissions = app_data.authorization_provider.permissions_of(&user.id).await?;

                Ok::<_, AuthError>(Json(ProfileResponse {
                    is_admin: is_admin(&permissions),
                    user_id: user.id,
                    username: user.username,
                    email: user.email,
                    created_at: user.created_at,
                    roles: roles.into_iter().collect(),
                    permissions: permissions.into_iter().collect(),
                }))
            })
            .await
            .map_err(AuthError::from_rejection)
    }
}

fn is_admin(permissions: &BTreeSet<String>) -> bool {
    ADMIN_PERMISSIONS
        .iter()
        .all(|permission| permissions.contains(*permission))
}
