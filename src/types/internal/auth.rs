use serde::{Deserialize, Serialize};

/// JWT Claims carried by the caller-held session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Username at login time
    pub username: String,

    /// Id of the session history row created at login
    pub sid: i64,

    /// JWT ID, used for revocation on logout
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity of an authenticated caller, as resolved from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub session_id: i64,
    pub token_id: String,
    pub expires_at: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            session_id: claims.sid,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Result of a successful login: the identity plus the bearer token the caller keeps
#[derive(Debug, Clone)]
pub struct AuthenticatedContext {
    pub identity: Identity,
    pub token: String,
}

impl std::fmt::Display for AuthenticatedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AuthenticatedContext {{ user: {}, session: {}, token: [redacted] }}",
            self.identity.username, self.identity.session_id
        )
    }
}
