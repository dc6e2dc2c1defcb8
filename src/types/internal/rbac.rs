use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::InternalError;
use crate::errors::internal::AdministrationError;

/// Role with the permission names it grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    pub permissions: Vec<String>,
}

/// Permissions and roles to provision
///
/// JSON form:
/// ```json
/// { "permissions": ["read"], "roles": [{ "name": "user", "permissions": ["read"] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacDefinitions {
    pub permissions: Vec<String>,
    pub roles: Vec<RoleDefinition>,
}

impl Default for RbacDefinitions {
    fn default() -> Self {
        let crud = ["read", "create", "update", "delete"].map(String::from).to_vec();
        Self {
            permissions: crud.clone(),
            roles: vec![
                RoleDefinition {
                    name: "user".to_string(),
                    permissions: vec!["read".to_string()],
                },
                RoleDefinition {
                    name: "admin".to_string(),
                    permissions: crud,
                },
            ],
        }
    }
}

impl RbacDefinitions {
    pub fn from_json_str(json: &str) -> Result<Self, InternalError> {
        serde_json::from_str(json)
            .map_err(|e| InternalError::parse("rbac definitions", e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InternalError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            InternalError::parse("rbac definitions", format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Every role may only reference permissions declared in `permissions`
    pub fn validate(&self) -> Result<(), AdministrationError> {
        let declared: BTreeSet<&str> = self.permissions.iter().map(String::as_str).collect();
        for role in &self.roles {
            if let Some(missing) = role
                .permissions
                .iter()
                .find(|permission| !declared.contains(permission.as_str()))
            {
                return Err(AdministrationError::PermissionNotFound {
                    permission: missing.clone(),
                    role: role.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Whether a get-or-create inserted the row or found it already present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned<T> {
    Created(T),
    Existing(T),
}

impl<T> Provisioned<T> {
    pub fn value(&self) -> &T {
        match self {
            Provisioned::Created(value) | Provisioned::Existing(value) => value,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Provisioned::Created(_))
    }
}

/// Link between a role and one of its permissions, by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionLink {
    pub role: String,
    pub permission: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub permissions: Vec<Provisioned<String>>,
    pub roles: Vec<Provisioned<String>>,
    pub links: Vec<Provisioned<RolePermissionLink>>,
}

impl BootstrapReport {
    /// Number of rows inserted by this run
    pub fn created_count(&self) -> usize {
        self.permissions.iter().filter(|p| p.is_created()).count()
            + self.roles.iter().filter(|r| r.is_created()).count()
            + self.links.iter().filter(|l| l.is_created()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    AlreadyAssigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotAssigned,
}
