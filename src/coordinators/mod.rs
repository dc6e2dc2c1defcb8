// Coordinators layer - Workflow orchestration
//
// Coordinators compose store operations into one administrative workflow and own
// the transaction around it.

pub mod role_admin_coordinator;

pub use role_admin_coordinator::RoleAdminCoordinator;
