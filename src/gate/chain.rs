use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;

use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::types::internal::ActionOutcome;
use crate::types::internal::auth::Identity;
use crate::types::internal::context::RequestContext;

use super::guards::{Guard, RequireAuthenticated, RequirePermission, RequireRole};
use super::verdict::{Denial, Verdict};

/// Why a guarded call did not produce a value
#[derive(Debug)]
pub enum Rejection<E> {
    Denied(Denial),
    Failed(E),
}

/// Ordered guards in front of one handler
///
/// Every chain starts with `RequireAuthenticated`; further guards run in the order
/// they were added and the first `Deny` wins.
pub struct GuardChain {
    provider: Arc<AuthorizationProvider>,
    login_path: String,
    guards: Vec<Box<dyn Guard>>,
}

impl GuardChain {
    pub fn authenticated(provider: Arc<AuthorizationProvider>, login_path: &str) -> Self {
        Self {
            provider,
            login_path: login_path.to_owned(),
            guards: vec![Box::new(RequireAuthenticated::new(login_path))],
        }
    }

    pub fn require_permission(self, permission: &str) -> Self {
        let guard = RequirePermission::new(self.provider.clone(), &self.login_path, permission);
        self.with_guard(guard)
    }

    pub fn require_role(self, role: &str) -> Self {
        let guard = RequireRole::new(self.provider.clone(), &self.login_path, role);
        self.with_guard(guard)
    }

    pub fn with_guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub async fn evaluate(&self, ctx: &RequestContext) -> Result<Verdict, InternalError> {
        for guard in &self.guards {
            if let Verdict::Deny(denial) = guard.check(ctx).await? {
                return Ok(Verdict::Deny(denial));
            }
        }
        Ok(Verdict::Allow)
    }

    /// Run `handler` only when every guard allows; it receives the caller's identity
    pub async fn run<T, E, F, Fut>(&self, ctx: &RequestContext, handler: F) -> Result<T, Rejection<E>>
    where
        E: From<InternalError>,
        F: FnOnce(Identity) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let identity = self.admit(ctx).await?;
        handler(identity).instrument(ctx.span()).await.map_err(Rejection::Failed)
    }

    /// Like `run`, then records the outcome's audit intent once the handler succeeded
    ///
    /// Nothing is recorded when the handler fails or reports no change.
    pub async fn run_mutation<T, E, F, Fut>(
        &self,
        ctx: &RequestContext,
        audit_logger: &AuditLogger,
        handler: F,
    ) -> Result<T, Rejection<E>>
    where
        E: From<InternalError>,
        F: FnOnce(Identity) -> Fut,
        Fut: Future<Output = Result<ActionOutcome<T>, E>>,
    {
        let identity = self.admit(ctx).await?;
        let actor = identity.user_id.clone();
        let span = ctx.span();
        let outcome = handler(identity)
            .instrument(span.clone())
            .await
            .map_err(Rejection::Failed)?;

        if let Some(intent) = &outcome.audit {
            audit_logger.record(&actor, &intent.action).instrument(span).await;
        }

        Ok(outcome.value)
    }

    async fn admit<E: From<InternalError>>(&self, ctx: &RequestContext) -> Result<Identity, Rejection<E>> {
        match self.evaluate(ctx).await {
            Ok(Verdict::Allow) => ctx
                .identity
                .clone()
                .ok_or_else(|| Rejection::Denied(Denial::Unauthenticated {
                    login_path: self.login_path.clone(),
                    resume_to: ctx.requested_target.clone(),
                })),
            Ok(Verdict::Deny(denial)) => Err(Rejection::Denied(denial)),
            Err(e) => Err(Rejection::Failed(E::from(e))),
        }
    }
}
