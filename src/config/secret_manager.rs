use std::fmt;
use std::sync::Arc;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug, PartialEq, Eq)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Holds the token signing secret and the password pepper
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with_env(Arc::new(SystemEnvironment))
    }

    /// Load and validate all secrets through the given provider
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init_with_env(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env_provider.as_ref(), &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env_provider.as_ref(), &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env("JWT_SECRET").required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env("PASSWORD_PEPPER").required(true).min_length(16)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Pepper passed to Argon2 as its secret parameter
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub(crate) fn load_secret(
        env_provider: &(dyn EnvironmentProvider + Send + Sync),
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env_provider.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(
                    config.secret_type.name(),
                    min_len,
                    value.len(),
                ));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const PEPPER: &str = "valid-pepper-16ch";

    fn env(vars: &[(&str, &str)]) -> Arc<dyn EnvironmentProvider + Send + Sync> {
        Arc::new(MockEnvironment::empty().with_vars(vars))
    }

    #[test]
    fn loads_valid_secrets() {
        let manager = SecretManager::init_with_env(env(&[
            ("JWT_SECRET", JWT),
            ("PASSWORD_PEPPER", PEPPER),
        ]))
        .unwrap();

        assert_eq!(manager.jwt_secret(), JWT);
        assert_eq!(manager.password_pepper(), PEPPER);
    }

    #[test]
    fn missing_jwt_secret_is_reported() {
        let result = SecretManager::init_with_env(env(&[("PASSWORD_PEPPER", PEPPER)]));

        assert_eq!(result.unwrap_err(), SecretError::missing("JWT_SECRET"));
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let result = SecretManager::init_with_env(env(&[
            ("JWT_SECRET", "too-short"),
            ("PASSWORD_PEPPER", PEPPER),
        ]));

        assert_eq!(
            result.unwrap_err(),
            SecretError::invalid_length("JWT_SECRET", 32, 9)
        );
    }

    #[test]
    fn short_pepper_is_rejected() {
        let result = SecretManager::init_with_env(env(&[
            ("JWT_SECRET", JWT),
            ("PASSWORD_PEPPER", "short"),
        ]));

        assert!(matches!(
            result,
            Err(SecretError::InvalidLength { ref secret_name, expected: 16, actual: 5 }) if secret_name == "PASSWORD_PEPPER"
        ));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let manager = SecretManager::init_with_env(env(&[
            ("JWT_SECRET", JWT),
            ("PASSWORD_PEPPER", PEPPER),
        ]))
        .unwrap();

        let debug = format!("{:?}", manager);

        assert!(!debug.contains(JWT));
        assert!(!debug.contains(PEPPER));
        assert!(debug.contains("<redacted>"));
    }
}
