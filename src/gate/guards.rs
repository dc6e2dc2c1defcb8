use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::types::internal::context::RequestContext;

use super::verdict::Verdict;

/// One check in front of a protected operation
///
/// A storage failure is an `Err`, never an `Allow`.
#[async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, ctx: &RequestContext) -> Result<Verdict, InternalError>;
}

/// Caller must carry an identity
pub struct RequireAuthenticated {
    login_path: String,
}

impl RequireAuthenticated {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn verdict(&self, ctx: &RequestContext) -> Verdict {
        if ctx.is_authenticated() {
            Verdict::Allow
        } else {
            tracing::debug!(request_id = %ctx.request_id, origin = %ctx.origin(), "Anonymous caller sent to login");
            Verdict::unauthenticated(&self.login_path, ctx.requested_target.clone())
        }
    }
}

#[async_trait]
impl Guard for RequireAuthenticated {
    async fn check(&self, ctx: &RequestContext) -> Result<Verdict, InternalError> {
        Ok(self.verdict(ctx))
    }
}

/// Caller must currently hold the named permission through one of their roles
pub struct RequirePermission {
    authenticated: RequireAuthenticated,
    provider: Arc<AuthorizationProvider>,
    permission: String,
}

impl RequirePermission {
    pub fn new(provider: Arc<AuthorizationProvider>, login_path: &str, permission: impl Into<String>) -> Self {
        Self {
            authenticated: RequireAuthenticated::new(login_path),
            provider,
            permission: permission.into(),
        }
    }
}

#[async_trait]
impl Guard for RequirePermission {
    async fn check(&self, ctx: &RequestContext) -> Result<Verdict, InternalError> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(self.authenticated.verdict(ctx));
        };

        if self.provider.has_permission(user_id, &self.permission).await? {
            Ok(Verdict::Allow)
        } else {
            tracing::info!(
                request_id = %ctx.request_id,
                origin = %ctx.origin(),
                "Permission '{}' denied for user {}",
                self.permission,
                user_id
            );
            Ok(Verdict::forbidden())
        }
    }
}

/// Caller must currently hold the named role
pub struct RequireRole {
    authenticated: RequireAuthenticated,
    provider: Arc<AuthorizationProvider>,
    role: String,
}

impl RequireRole {
    pub fn new(provider: Arc<AuthorizationProvider>, login_path: &str, role: impl Into<String>) -> Self {
        Self {
            authenticated: RequireAuthenticated::new(login_path),
            provider,
            role: role.into(),
        }
    }
}

#[async_trait]
impl Guard for RequireRole {
    async fn check(&self, ctx: &RequestContext) -> Result<Verdict, InternalError> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(self.authenticated.verdict(ctx));
        };

        if self.provider.has_role(user_id, &self.role).await? {
            Ok(Verdict::Allow)
        } else {
            tracing::info!(
                request_id = %ctx.request_id,
                origin = %ctx.origin(),
                "Role '{}' denied for user {}",
                self.role,
                user_id
            );
            Ok(Verdict::forbidden())
        }
    }
}
