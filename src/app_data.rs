use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditLogger;
use crate::config::{BootstrapSettings, SecretManager};
use crate::coordinators::RoleAdminCoordinator;
use crate::errors::InternalError;
use crate::gate::AuthorizationGate;
use crate::providers::{AuthorizationProvider, CryptoProvider, SessionProvider, TokenProvider, UserProvider};
use crate::stores::{AuditStore, AuthorizationStore, CredentialStore, SessionStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once in main.rs (or by the CLI) and shared by reference.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ stores: credential, authorization, session, audit (stateless, take a connection)
///   ├─ providers: crypto, token, authorization, session, user (own the db handle)
///   ├─ audit_logger
///   ├─ role_admin (RoleAdminCoordinator)
///   └─ gate (AuthorizationGate)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to the API and CLI
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: BootstrapSettings,
    pub secret_manager: Arc<SecretManager>,

    pub credential_store: Arc<CredentialStore>,
    pub authorization_store: Arc<AuthorizationStore>,
    pub session_store: Arc<SessionStore>,
    pub audit_store: Arc<AuditStore>,

    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub authorization_provider: Arc<AuthorizationProvider>,
    pub session_provider: Arc<SessionProvider>,
    pub user_provider: Arc<UserProvider>,

    pub audit_logger: Arc<AuditLogger>,
    pub role_admin: Arc<RoleAdminCoordinator>,
    pub gate: Arc<AuthorizationGate>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secrets are missing or too short
    pub async fn init(db: DatabaseConnection, settings: BootstrapSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(
            SecretManager::init()
                .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?,
        );
        tracing::debug!("Secret manager initialized");

        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.password_pepper())?);

        let app_data = Self::assemble(db, settings, secret_manager, crypto_provider);

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Wire stores and providers around already prepared secrets and hashing parameters
    pub fn assemble(
        db: DatabaseConnection,
        settings: BootstrapSettings,
        secret_manager: Arc<SecretManager>,
        crypto_provider: Arc<CryptoProvider>,
    ) -> Self {
        tracing::debug!("Creating stores...");
        let credential_store = Arc::new(CredentialStore::new(crypto_provider.clone()));
        let authorization_store = Arc::new(AuthorizationStore::new());
        let session_store = Arc::new(SessionStore::new());
        let audit_store = Arc::new(AuditStore::new());
        tracing::debug!("Stores created");

        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.session_ttl_minutes(),
        ));
        let authorization_provider = Arc::new(AuthorizationProvider::new(
            db.clone(),
            authorization_store.clone(),
        ));
        let session_provider = Arc::new(SessionProvider::new(
            db.clone(),
            credential_store.clone(),
            session_store.clone(),
            token_provider.clone(),
        ));
        let user_provider = Arc::new(UserProvider::new(
            db.clone(),
            credential_store.clone(),
            crypto_provider.clone(),
        ));

        let audit_logger = Arc::new(AuditLogger::new(
            db.clone(),
            audit_store.clone(),
            settings.audit_default_limit(),
            settings.audit_max_limit(),
        ));
        let role_admin = Arc::new(RoleAdminCoordinator::new(
            db.clone(),
            credential_store.clone(),
            authorization_store.clone(),
        ));
        let gate = Arc::new(AuthorizationGate::new(authorization_provider.clone()));

        Self {
            db,
            settings,
            secret_manager,
            credential_store,
            authorization_store,
            session_store,
            audit_store,
            crypto_provider,
            token_provider,
            authorization_provider,
            session_provider,
            user_provider,
            audit_logger,
            role_admin,
            gate,
        }
    }
}
