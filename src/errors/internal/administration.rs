use thiserror::Error;

/// Failures of role assignment and role/permission bootstrap
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdministrationError {
    #[error("User '{username}' not found")]
    UserNotFound { username: String },

    #[error("Role '{role}' not found")]
    RoleNotFound { role: String },

    #[error("Permission '{permission}' referenced by role '{role}' is not defined")]
    PermissionNotFound { permission: String, role: String },
}
