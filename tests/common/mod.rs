// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use argon2::Params;
use media_explorer_backend::AppData;
use media_explorer_backend::config::database::{connect_url, migrate_database};
use media_explorer_backend::config::{BootstrapSettings, EnvironmentProvider, SecretManager};
use media_explorer_backend::providers::{CryptoProvider, RegistrationRequest};
use media_explorer_backend::types::internal::context::RequestContext;
use media_explorer_backend::types::internal::rbac::RbacDefinitions;

/// Fixed set of variables standing in for the process environment
pub struct StaticEnvironment(HashMap<String, String>);

impl StaticEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Full application over a migrated in-memory database, default roles provisioned
pub async fn setup_app() -> Arc<AppData> {
    let app_data = build_app("sqlite::memory:").await;
    app_data
        .role_admin
        .bootstrap_roles_and_permissions(&RbacDefinitions::default())
        .await
        .expect("Failed to bootstrap default roles");

    app_data
}

/// Application over a migrated database at `database_url`, nothing provisioned
pub async fn build_app(database_url: &str) -> Arc<AppData> {
    let db = connect_url(database_url)
        .await
        .expect("Failed to create test database");
    migrate_database(&db)
        .await
        .expect("Failed to run migrations");

    let env = Arc::new(StaticEnvironment::new(&[
        ("JWT_SECRET", "integration-test-jwt-secret-of-32-chars!"),
        ("PASSWORD_PEPPER", "integration-pepper"),
        ("AUDIT_DEFAULT_LIMIT", "50"),
    ]));
    let settings = BootstrapSettings::from_env_provider(env.clone()).expect("Failed to load test settings");
    let secret_manager = Arc::new(SecretManager::init_with_env(env).expect("Failed to load test secrets"));

    // Cheap Argon2 parameters so the suite does not spend its time hashing
    let params = Params::new(8, 1, 1, None).expect("Invalid Argon2 params");
    let crypto_provider = Arc::new(
        CryptoProvider::with_params(secret_manager.password_pepper(), params)
            .expect("Failed to create CryptoProvider"),
    );

    Arc::new(AppData::assemble(db, settings, secret_manager, crypto_provider))
}

/// Register through the normal path; returns the user id
pub async fn register(app_data: &AppData, username: &str, password: &str) -> String {
    app_data
        .user_provider
        .register(RegistrationRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            confirm_password: password.to_string(),
        })
        .await
        .expect("Failed to register test user")
}

/// Log in and return the request context a handler would see
pub async fn logged_in(app_data: &AppData, username: &str, password: &str) -> RequestContext {
    let authenticated = app_data
        .session_provider
        .authenticate(username, password)
        .await
        .expect("Failed to log in");

    RequestContext::anonymous().with_identity(authenticated.identity)
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        // Clean up before setting new values
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
