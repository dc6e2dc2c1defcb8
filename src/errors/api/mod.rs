// API-facing error types
pub mod admin;
pub mod auth;

#[cfg(test)]
mod auth_test;

// Re-exports for convenience
pub use admin::AdminError;
pub use auth::AuthError;
