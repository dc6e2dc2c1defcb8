use std::sync::Arc;

use argon2::password_hash::{PasswordHash as ParsedHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::PasswordHash;

const DUMMY_PASSWORD: &str = "media-explorer-dummy-password";

/// Argon2id hashing and verification, peppered with the application secret
///
/// Hashing runs on the blocking pool so a login never stalls the async executor.
/// A hash of a throwaway password is computed up front and used by `verify_dummy`
/// so an unknown username costs the same as a wrong password.
pub struct CryptoProvider {
    pepper: Arc<[u8]>,
    params: Params,
    dummy_hash: String,
}

impl CryptoProvider {
    /// Create a provider with the default Argon2id cost parameters
    pub fn new(pepper: &str) -> Result<Self, InternalError> {
        Self::with_params(pepper, Params::default())
    }

    pub fn with_params(pepper: &str, params: Params) -> Result<Self, InternalError> {
        let pepper: Arc<[u8]> = Arc::from(pepper.as_bytes());
        let dummy_hash = hash_blocking(&pepper, &params, DUMMY_PASSWORD)?;

        Ok(Self {
            pepper,
            params,
            dummy_hash,
        })
    }

    /// Hash a plaintext password with a fresh random salt
    pub async fn hash_password(&self, password: &str) -> Result<PasswordHash, InternalError> {
        let pepper = self.pepper.clone();
        let params = self.params.clone();
        let password = password.to_owned();

        let hash = tokio::task::spawn_blocking(move || hash_blocking(&pepper, &params, &password))
            .await
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))??;

        Ok(PasswordHash(hash))
    }

    /// Constant-time comparison of `password` against a stored PHC string
    ///
    /// A stored hash that cannot be parsed counts as a mismatch.
    pub async fn verify_password(&self, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
        let pepper = self.pepper.clone();
        let params = self.params.clone();
        let stored_hash = stored_hash.to_owned();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || verify_blocking(&pepper, &params, &stored_hash, &password))
            .await
            .map_err(|e| InternalError::crypto("verify_password", e.to_string()))?
    }

    /// Burn one verification for a user that does not exist
    pub async fn verify_dummy(&self, password: &str) -> Result<(), InternalError> {
        self.verify_password(&self.dummy_hash, password).await?;
        Ok(())
    }
}

fn argon2<'k>(pepper: &'k [u8], params: &Params) -> Result<Argon2<'k>, InternalError> {
    Argon2::new_with_secret(pepper, Algorithm::Argon2id, Version::V0x13, params.clone())
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
}

fn hash_blocking(pepper: &[u8], params: &Params, password: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    argon2(pepper, params)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| InternalError::from(CredentialError::PasswordHashingFailed(e.to_string())))
}

fn verify_blocking(pepper: &[u8], params: &Params, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
    let parsed = match ParsedHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is not a valid PHC string: {}", e);
            return Ok(false);
        }
    };

    Ok(argon2(pepper, params)?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl std::fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("pepper", &"<redacted>")
            .field("params", &self.params)
            .finish()
    }
}
