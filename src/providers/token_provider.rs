use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;

/// Issues, validates and revokes the HS256 session tokens held by callers
///
/// Revocation is process-local: a map of token id to expiry, pruned whenever a
/// new token is revoked.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    session_ttl_minutes: i64,
    revoked: RwLock<HashMap<String, i64>>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, session_ttl_minutes: i64) -> Self {
        Self {
            secret_manager,
            session_ttl_minutes,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a token for a freshly started session
    ///
    /// # Returns
    /// The encoded token together with the claims it carries
    pub fn issue(&self, user_id: &str, username: &str, session_id: i64) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_owned(),
            username: username.to_owned(),
            sid: session_id,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.session_ttl_minutes * 60,
        };

        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Validate signature, expiry and revocation state of a token
    pub async fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(CredentialError::ExpiredToken("jwt".to_string())),
            _ => InternalError::from(CredentialError::invalid_token("jwt", "invalid signature or malformed")),
        })?
        .claims;

        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(CredentialError::invalid_token("jwt", "revoked").into());
        }

        Ok(claims)
    }

    /// Revoke one token id until its natural expiry
    pub async fn revoke(&self, jti: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(jti.to_owned(), expires_at);
    }

    pub async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }

    pub fn session_ttl_minutes(&self) -> i64 {
        self.session_ttl_minutes
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenProvider {{ session_ttl: {}min }}", self.session_ttl_minutes)
    }
}
