use std::sync::Arc;

use argon2::Params;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::database::{connect_url, migrate_database};
use crate::config::{BootstrapSettings, MockEnvironment, SecretManager};
use crate::providers::{CryptoProvider, RegistrationRequest};
use crate::stores::AuthorizationStore;
use crate::types::db::user;
use crate::types::internal::context::RequestContext;
use crate::types::internal::rbac::RbacDefinitions;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh migrated in-memory database
pub async fn setup_test_db() -> DatabaseConnection {
    let db = connect_url("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    migrate_database(&db)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_secret_manager() -> SecretManager {
    let env = MockEnvironment::empty()
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER);

    SecretManager::init_with_env(Arc::new(env)).expect("Failed to initialize test SecretManager")
}

/// Defaults for every setting, no environment involved
pub fn test_settings() -> BootstrapSettings {
    BootstrapSettings::from_env_provider(Arc::new(MockEnvironment::empty()))
        .expect("Failed to build test settings")
}

/// Argon2id with minimal cost so tests do not spend seconds hashing
pub fn test_crypto_provider() -> Arc<CryptoProvider> {
    let params = Params::new(8, 1, 1, None).expect("Invalid test Argon2 params");
    Arc::new(CryptoProvider::with_params(TEST_PASSWORD_PEPPER, params).expect("Failed to create test CryptoProvider"))
}

/// Insert a bare user row (unusable password) and return its id
pub async fn insert_test_user(db: &DatabaseConnection, username: &str) -> String {
    let user_id = Uuid::new_v4().to_string();

    user::ActiveModel {
        id: Set(user_id.clone()),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(Utc::now().timestamp()),
    }
    .insert(db)
    .await
    .expect("Failed to insert test user");

    user_id
}

/// Provision the default `user` and `admin` roles straight through the store
pub async fn seed_default_roles(db: &DatabaseConnection) {
    let store = AuthorizationStore::new();
    let definitions = RbacDefinitions::default();

    for name in &definitions.permissions {
        store
            .get_or_create_permission(db, name)
            .await
            .expect("Failed to seed permission");
    }

    for definition in &definitions.roles {
        let role = store
            .get_or_create_role(db, &definition.name)
            .await
            .expect("Failed to seed role");
        for permission_name in &definition.permissions {
            let permission = store
                .find_permission(db, permission_name)
                .await
                .expect("Failed to read permission")
                .expect("Seeded permission missing");
            store
                .link_role_permission(db, role.value().id, permission.id)
                .await
                .expect("Failed to link permission");
        }
    }
}

/// Full application wiring over an in-memory database with the default roles provisioned
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let app_data = AppData::assemble(
        db,
        test_settings(),
        Arc::new(test_secret_manager()),
        test_crypto_provider(),
    );

    app_data
        .role_admin
        .bootstrap_roles_and_permissions(&RbacDefinitions::default())
        .await
        .expect("Failed to bootstrap default roles");

    Arc::new(app_data)
}

/// Register a user through the normal registration path and return its id
pub async fn create_test_user(app_data: &AppData, username: &str, password: &str) -> String {
    app_data
        .user_provider
        .register(RegistrationRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirm_password: password.to_string(),
        })
        .await
        .expect("Failed to create test user")
}

/// Log in and return a request context carrying the resulting identity
pub async fn login_context(app_data: &AppData, username: &str, password: &str) -> RequestContext {
    let authenticated = app_data
        .session_provider
        .authenticate(username, password)
        .await
        .expect("Failed to log in test user");

    RequestContext::anonymous().with_identity(authenticated.identity)
}
