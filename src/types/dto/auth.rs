use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// ID of the new user (UUID)
    pub user_id: String,

    pub username: String,

    pub message: String,
}

/// API response for register endpoint
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the session token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    pub username: String,

    /// Number of seconds until the token expires
    pub expires_in: i64,
}

/// Response model for logout
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Success message
    pub message: String,
}

/// Who the caller is and what they may do right now
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,

    /// Account creation time (Unix timestamp)
    pub created_at: i64,

    pub roles: Vec<String>,
    pub permissions: Vec<String>,

    /// Holds read, create, update and delete
    pub is_admin: bool,
}
