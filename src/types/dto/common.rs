use poem_openapi::Object;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Body returned when a protected endpoint is called without a valid session
#[derive(Object, Debug)]
pub struct LoginRequiredResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Where to log in
    pub login_url: String,

    /// Target to resume after logging in
    pub next: Option<String>,

    /// HTTP status code
    pub status_code: u16,
}
