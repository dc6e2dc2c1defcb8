use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::stores::{CredentialStore, SessionStore};
use crate::types::internal::auth::{AuthenticatedContext, Identity};
use crate::types::internal::context::RequestContext;
use crate::types::internal::user::User;

/// Establishes, resolves and ends caller sessions
pub struct SessionProvider {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    session_store: Arc<SessionStore>,
    token_provider: Arc<TokenProvider>,
}

impl SessionProvider {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        session_store: Arc<SessionStore>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            db,
            credential_store,
            session_store,
            token_provider,
        }
    }

    /// Verify credentials, append a session history row and issue a token
    ///
    /// # Errors
    /// `CredentialError::InvalidCredentials` for any bad username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedContext, InternalError> {
        let user = match self.credential_store.verify_credentials(&self.db, username, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Login rejected: {}", e);
                return Err(e);
            }
        };

        let session = self.session_store.start_session(&self.db, &user.id).await?;
        let (token, claims) = self.token_provider.issue(&user.id, &user.username, session.id)?;

        tracing::info!("User {} logged in (session {})", user.username, session.id);

        Ok(AuthenticatedContext {
            identity: Identity::from(claims),
            token,
        })
    }

    /// Identity behind a bearer token, `None` when the token is not usable
    pub async fn resolve(&self, token: &str) -> Option<Identity> {
        match self.token_provider.validate(token).await {
            Ok(claims) => Some(Identity::from(claims)),
            Err(e) => {
                tracing::debug!("Bearer token not accepted: {}", e);
                None
            }
        }
    }

    /// End one live session; other sessions of the same user stay valid
    pub async fn terminate(&self, identity: &Identity) {
        self.token_provider.revoke(&identity.token_id, identity.expires_at).await;
        tracing::info!("User {} logged out (session {})", identity.username, identity.session_id);
    }

    /// User row of the caller, `None` for anonymous callers or deleted users
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<Option<User>, InternalError> {
        match ctx.user_id() {
            Some(user_id) => self.credential_store.find_by_id(&self.db, user_id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CredentialError;
    use crate::test::utils::{create_test_user, setup_test_app_data};

    #[tokio::test]
    async fn authenticate_issues_a_resolvable_token() {
        let app_data = setup_test_app_data().await;
        let user_id = create_test_user(&app_data, "alice", "wonderland").await;
        let sessions = &app_data.session_provider;

        let ctx = sessions.authenticate("alice", "wonderland").await.unwrap();
        let identity = sessions.resolve(&ctx.token).await.unwrap();

        assert_eq!(identity, ctx.identity);
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let app_data = setup_test_app_data().await;
        create_test_user(&app_data, "alice", "wonderland").await;
        let sessions = &app_data.session_provider;

        let wrong_password = sessions.authenticate("alice", "looking-glass").await.unwrap_err();
        let unknown_user = sessions.authenticate("mallory", "looking-glass").await.unwrap_err();

        assert!(matches!(wrong_password, InternalError::Credential(CredentialError::InvalidCredentials)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn each_login_records_history() {
        let app_data = setup_test_app_data().await;
        let user_id = create_test_user(&app_data, "alice", "wonderland").await;

        let first = app_data.session_provider.authenticate("alice", "wonderland").await.unwrap();
        let second = app_data.session_provider.authenticate("alice", "wonderland").await.unwrap();
        let history = app_data.session_store.sessions_of(&app_data.db, &user_id).await.unwrap();

        assert_ne!(first.identity.session_id, second.identity.session_id);
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn terminate_ends_only_that_session() {
        let app_data = setup_test_app_data().await;
        create_test_user(&app_data, "alice", "wonderland").await;
        let sessions = &app_data.session_provider;
        let laptop = sessions.authenticate("alice", "wonderland").await.unwrap();
        let phone = sessions.authenticate("alice", "wonderland").await.unwrap();

        sessions.terminate(&laptop.identity).await;

        assert!(sessions.resolve(&laptop.token).await.is_none());
        assert!(sessions.resolve(&phone.token).await.is_some());
    }

    #[tokio::test]
    async fn current_user_follows_the_context() {
        let app_data = setup_test_app_data().await;
        create_test_user(&app_data, "alice", "wonderland").await;
        let sessions = &app_data.session_provider;
        let login = sessions.authenticate("alice", "wonderland").await.unwrap();

        let anonymous = sessions.current_user(&RequestContext::anonymous()).await.unwrap();
        let signed_in = sessions
            .current_user(&RequestContext::anonymous().with_identity(login.identity))
            .await
            .unwrap();

        assert!(anonymous.is_none());
        assert_eq!(signed_in.map(|user| user.username), Some("alice".to_string()));
    }
}
