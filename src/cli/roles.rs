// Role administration commands
// bootstrap-roles provisions permissions/roles; assign-role adds or removes one assignment

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::Instrument;

use crate::coordinators::RoleAdminCoordinator;
use crate::errors::InternalError;
use crate::errors::internal::AdministrationError;
use crate::types::internal::context::RequestContext;
use crate::types::internal::rbac::{AssignOutcome, BootstrapReport, Provisioned, RbacDefinitions, RemoveOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Add,
    Remove,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Error: Invalid action '{0}'. Use 'add' or 'remove'.")]
pub struct InvalidAction(pub String);

impl FromStr for RoleAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = s.to_lowercase();
        match action.as_str() {
            "add" => Ok(RoleAction::Add),
            "remove" => Ok(RoleAction::Remove),
            _ => Err(InvalidAction(action)),
        }
    }
}

/// Add or remove one role assignment and describe what happened
///
/// An unknown user or role is reported in the returned message, not as an error;
/// only storage failures come back as `Err`.
pub async fn change_role(
    role_admin: &RoleAdminCoordinator,
    username: &str,
    role_name: &str,
    action: RoleAction,
) -> Result<String, InternalError> {
    let result = match action {
        RoleAction::Add => role_admin.assign_role(username, role_name).await.map(|outcome| match outcome {
            AssignOutcome::Assigned => {
                format!("✅ Successfully assigned role '{}' to user '{}'.", role_name, username)
            }
            AssignOutcome::AlreadyAssigned => {
                format!("User '{}' already has role '{}'.", username, role_name)
            }
        }),
        RoleAction::Remove => role_admin.remove_role(username, role_name).await.map(|outcome| match outcome {
            RemoveOutcome::Removed => {
                format!("✅ Successfully removed role '{}' from user '{}'.", role_name, username)
            }
            RemoveOutcome::NotAssigned => {
                format!("User '{}' does not have role '{}'.", username, role_name)
            }
        }),
    };

    match result {
        Ok(message) => Ok(message),
        Err(InternalError::Administration(AdministrationError::UserNotFound { username })) => {
            Ok(format!("Error: User '{}' not found.", username))
        }
        Err(InternalError::Administration(AdministrationError::RoleNotFound { role })) => {
            Ok(format!("Error: Role '{}' not found.", role))
        }
        Err(e) => Err(e),
    }
}

/// `assign-role <username> <role_name> <action>`
pub async fn assign_role(
    role_admin: &RoleAdminCoordinator,
    username: &str,
    role_name: &str,
    action: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let action: RoleAction = action.parse()?;
    let ctx = RequestContext::for_cli("assign-role");

    let message = change_role(role_admin, username, role_name, action)
        .instrument(ctx.span())
        .await?;
    tracing::info!(
        request_id = %ctx.request_id,
        origin = %ctx.origin(),
        "assign-role {:?} '{}' for '{}': {}",
        action,
        role_name,
        username,
        message
    );
    println!("{}", message);
    Ok(())
}

/// `bootstrap-roles [--definitions <file>]`
pub async fn bootstrap_roles(
    role_admin: &RoleAdminCoordinator,
    definitions_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let definitions = match definitions_path {
        Some(path) => RbacDefinitions::from_file(path)?,
        None => RbacDefinitions::default(),
    };

    let ctx = RequestContext::for_cli("bootstrap-roles");

    println!("Initializing roles and permissions...");
    let report = role_admin
        .bootstrap_roles_and_permissions(&definitions)
        .instrument(ctx.span())
        .await?;
    tracing::info!(
        request_id = %ctx.request_id,
        origin = %ctx.origin(),
        "bootstrap-roles created {} rows",
        report.created_count()
    );

    for line in describe_report(&report) {
        println!("{}", line);
    }
    println!("\n✅ Roles and permissions initialized successfully!");

    Ok(())
}

/// One line per permission, role and link, in provisioning order
pub fn describe_report(report: &BootstrapReport) -> Vec<String> {
    let mut lines = Vec::new();

    for permission in &report.permissions {
        lines.push(match permission {
            Provisioned::Created(name) => format!("Created permission '{}'", name),
            Provisioned::Existing(name) => format!("Permission '{}' already exists", name),
        });
    }
    for role in &report.roles {
        lines.push(match role {
            Provisioned::Created(name) => format!("Created role '{}'", name),
            Provisioned::Existing(name) => format!("Role '{}' already exists", name),
        });
    }
    for link in &report.links {
        lines.push(match link {
            Provisioned::Created(link) => {
                format!("  Assigned permission '{}' to role '{}'", link.permission, link.role)
            }
            Provisioned::Existing(link) => {
                format!("  Permission '{}' already assigned to role '{}'", link.permission, link.role)
            }
        });
    }

    lines
}
