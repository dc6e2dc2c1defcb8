use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::InternalError;
use crate::errors::internal::RegistrationError;
use crate::providers::CryptoProvider;
use crate::stores::CredentialStore;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Input of a self-service registration
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationRequest {
    /// Every rule is checked so the caller sees all problems at once
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut errors = Vec::new();

        if self.username.trim().is_empty() {
            errors.push("Username is required.".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password is required.".to_string());
        }
        if self.password != self.confirm_password {
            errors.push("Passwords do not match.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LENGTH
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistrationError::Invalid(errors))
        }
    }
}

/// Account creation
pub struct UserProvider {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    crypto_provider: Arc<CryptoProvider>,
}

impl UserProvider {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        crypto_provider: Arc<CryptoProvider>,
    ) -> Self {
        Self {
            db,
            credential_store,
            crypto_provider,
        }
    }

    /// Validate, hash and store a new user; returns the new user id
    pub async fn register(&self, request: RegistrationRequest) -> Result<String, InternalError> {
        request.validate()?;

        let password_hash = self.crypto_provider.hash_password(&request.password).await?;
        self.credential_store
            .create_user(
                &self.db,
                request.username.trim(),
                request.email.trim(),
                password_hash,
            )
            .await
    }
}
