//! Authorization gate: the permission check in front of every protected operation
//!
//! The gate only reads. It never writes audit entries and never changes state;
//! `GuardChain::run_mutation` is where a successful mutation gets recorded.

pub mod chain;
pub mod guards;
pub mod verdict;

use std::sync::Arc;

use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::types::internal::context::RequestContext;

pub use chain::{GuardChain, Rejection};
pub use guards::{Guard, RequireAuthenticated, RequirePermission, RequireRole};
pub use verdict::{Denial, LOGIN_PATH, Verdict};

pub struct AuthorizationGate {
    provider: Arc<AuthorizationProvider>,
    login_path: String,
}

impl AuthorizationGate {
    pub fn new(provider: Arc<AuthorizationProvider>) -> Self {
        Self::with_login_path(provider, LOGIN_PATH)
    }

    pub fn with_login_path(provider: Arc<AuthorizationProvider>, login_path: &str) -> Self {
        Self {
            provider,
            login_path: login_path.to_owned(),
        }
    }

    pub fn require_authenticated(&self, ctx: &RequestContext) -> Verdict {
        RequireAuthenticated::new(self.login_path.as_str()).verdict(ctx)
    }

    /// Identity first, then a live permission lookup
    pub async fn require_permission(&self, ctx: &RequestContext, permission: &str) -> Result<Verdict, InternalError> {
        RequirePermission::new(self.provider.clone(), &self.login_path, permission)
            .check(ctx)
            .await
    }

    pub async fn require_role(&self, ctx: &RequestContext, role: &str) -> Result<Verdict, InternalError> {
        RequireRole::new(self.provider.clone(), &self.login_path, role)
            .check(ctx)
            .await
    }

    /// Start a chain that already requires authentication
    pub fn chain(&self) -> GuardChain {
        GuardChain::authenticated(self.provider.clone(), &self.login_path)
    }
}
