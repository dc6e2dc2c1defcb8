use poem_openapi::Object;

/// Result of a role assignment or removal
#[derive(Object, Debug)]
pub struct RoleChangeResponse {
    /// Whether the assignment set changed
    pub changed: bool,

    /// Human-readable message describing the result
    pub message: String,
}
