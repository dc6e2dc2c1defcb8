use crate::errors::internal::{AdministrationError, InternalError};
use crate::gate::{Denial, Rejection};
use crate::types::dto::common::LoginRequiredResponse;
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for admin and audit endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Admin operation error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// No valid session; log in and come back
    #[oai(status = 401)]
    Unauthenticated(Json<LoginRequiredResponse>),

    /// Authenticated but not allowed
    #[oai(status = 403)]
    Forbidden(Json<AdminErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<AdminErrorResponse>),

    /// Role not found
    #[oai(status = 404)]
    RoleNotFound(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

impl AdminError {
    pub fn unauthenticated(login_url: String, next: Option<String>) -> Self {
        AdminError::Unauthenticated(Json(LoginRequiredResponse {
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
        AdminError::Forbidden(Json(AdminErrorResponse {
            error: "forbidden".to_string(),
            message: Denial::Forbidden.to_string(),
            status_code: 403,
        }))
    }

    /// Create a UserNotFound error
    pub fn user_not_found(username: &str) -> Self {
        AdminError::UserNotFound(Json(AdminErrorResponse {
            error: "user_not_found".to_string(),
            message: format!("User '{}' not found.", username),
            status_code: 404,
        }))
    }

    /// Create a RoleNotFound error
    pub fn role_not_found(role: &str) -> Self {
        AdminError::RoleNotFound(Json(AdminErrorResponse {
            error: "role_not_found".to_string(),
            message: format!("Role '{}' not found.", role),
            status_code: 404,
        }))
    }

    pub fn from_denial(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated { login_path, resume_to } => Self::unauthenticated(login_path, resume_to),
            Denial::Forbidden => Self::forbidden(),
        }
    }

    pub fn from_rejection(rejection: Rejection<AdminError>) -> Self {
        match rejection {
            Rejection::Denied(denial) => Self::from_denial(denial),
            Rejection::Failed(err) => err,
        }
    }

    /// Convert InternalError to AdminError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(_) => {
                tracing::error!("Database error in admin operation: {}", err);
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

            // Administration domain errors
            InternalError::Administration(AdministrationError::UserNotFound { username }) => {
                Self::user_not_found(username)
            }
            InternalError::Administration(AdministrationError::RoleNotFound { role }) => {
                Self::role_not_found(role)
            }
            // Other domain errors
            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AdminError::InternalError(Json(AdminErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::Unauthenticated(json) => json.0.message.clone(),
            AdminError::Forbidden(json) => json.0.message.clone(),
            AdminError::UserNotFound(json) => json.0.message.clone(),
            AdminError::RoleNotFound(json) => json.0.message.clone(),
            AdminError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::Unauthenticated(json) => json.0.status_code,
            AdminError::Forbidden(json) => json.0.status_code,
            AdminError::UserNotFound(json) => json.0.status_code,
            AdminError::RoleNotFound(json) => json.0.status_code,
            AdminError::InternalError(json) => json.0.status_code,
        }
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
