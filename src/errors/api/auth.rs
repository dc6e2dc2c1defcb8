use crate::errors::internal::{CredentialError, InternalError};
use crate::gate::{Denial, Rejection};
use crate::types::dto::common::LoginRequiredResponse;
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Registration input rejected
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// Username already exists
    #[oai(status = 409)]
    DuplicateUsername(Json<AuthErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<AuthErrorResponse>),

    /// No valid session; log in and come back
    #[oai(status = 401)]
    Unauthenticated(Json<LoginRequiredResponse>),

    /// Authenticated but not allowed
    #[oai(status = 403)]
    Forbidden(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid username or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create a ValidationFailed error; messages are joined in the order they were found
    pub fn validation_failed(messages: &[String]) -> Self {
        AuthError::ValidationFailed(Json(AuthErrorResponse {
            error: "validation_failed".to_string(),
            message: messages.join(" "),
            status_code: 400,
        }))
    }

    /// Create a DuplicateUsername error
    pub fn duplicate_username() -> Self {
        AuthError::DuplicateUsername(Json(AuthErrorResponse {
            error: "duplicate_username".to_string(),
            message: "Username already exists".to_string(),
            status_code: 409,
        }))
    }

    /// Create a DuplicateEmail error
    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(Json(AuthErrorResponse {
            error: "duplicate_email".to_string(),
            message: "Email already registered".to_string(),
            status_code: 409,
        }))
    }

    pub fn unauthenticated(login_url: String, next: Option<String>) -> Self {
        AuthError::Unauthenticated(Json(LoginRequiredResponse {
            error: "unauthenticated".to_string(),
            message: Denial::Unauthenticated {
                login_path: login_url.clone(),
                resume_to: next.clone(),
            }
            .to_string(),
            login_url,
            next,
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        AuthError::Forbidden(Json(AuthErrorResponse {
            error: "forbidden".to_string(),
            message: Denial::Forbidden.to_string(),
            status_code: 403,
        }))
    }

    pub fn from_denial(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated { login_path, resume_to } => Self::unauthenticated(login_path, resume_to),
            Denial::Forbidden => Self::forbidden(),
        }
    }

    pub fn from_rejection(rejection: Rejection<AuthError>) -> Self {
        match rejection {
            Rejection::Denied(denial) => Self::from_denial(denial),
            Rejection::Failed(err) => err,
        }
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(_) => {
                tracing::error!("Database error in auth operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            // Domain errors - convert to specific API errors
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!("Duplicate username attempt: {}", username);
                Self::duplicate_username()
            }
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate email attempt: {}", email);
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::InvalidToken { .. })
            | InternalError::Credential(CredentialError::ExpiredToken(_)) => {
                tracing::debug!("Rejected token: {}", err);
                Self::unauthenticated(crate::gate::LOGIN_PATH.to_string(), None)
            }
            InternalError::Registration(registration) => {
                tracing::debug!("Registration rejected: {}", registration);
                Self::validation_failed(registration.messages())
            }

            // Other domain errors that shouldn't appear in auth context
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(AuthErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::ValidationFailed(json) => json.0.message.clone(),
            AuthError::DuplicateUsername(json) => json.0.message.clone(),
            AuthError::DuplicateEmail(json) => json.0.message.clone(),
            AuthError::Unauthenticated(json) => json.0.message.clone(),
            AuthError::Forbidden(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
