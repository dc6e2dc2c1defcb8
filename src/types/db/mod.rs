// Database entities - SeaORM models
pub mod audit_log;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod session;
pub mod user;
pub mod user_role;
