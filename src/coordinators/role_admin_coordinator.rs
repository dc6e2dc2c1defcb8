use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::AdministrationError;
use crate::stores::{AuthorizationStore, CredentialStore};
use crate::types::ProviderResult;
use crate::types::db::{role, user};
use crate::types::internal::rbac::{
    AssignOutcome, BootstrapReport, Provisioned, RbacDefinitions, RemoveOutcome, RolePermissionLink,
};
use crate::types::internal::{ActionOutcome, AuditIntent};

/// Role assignment and role/permission provisioning
///
/// Shared by the CLI and the admin endpoints. Nothing here checks who is asking;
/// HTTP callers go through the authorization gate first.
pub struct RoleAdminCoordinator {
    db: DatabaseConnection,
    credential_store: Arc<CredentialStore>,
    authorization_store: Arc<AuthorizationStore>,
}

impl RoleAdminCoordinator {
    pub fn new(
        db: DatabaseConnection,
        credential_store: Arc<CredentialStore>,
        authorization_store: Arc<AuthorizationStore>,
    ) -> Self {
        Self {
            db,
            credential_store,
            authorization_store,
        }
    }

    /// Give `role` to `username`
    ///
    /// # Returns
    /// * `Ok(AssignOutcome::Assigned)` - A new assignment row was written
    /// * `Ok(AssignOutcome::AlreadyAssigned)` - The user already held the role, nothing changed
    /// * `Err(InternalError)` - UserNotFound, RoleNotFound or a database error
    pub async fn assign_role(&self, username: &str, role_name: &str) -> Result<AssignOutcome, InternalError> {
        let (user, role) = self.resolve(username, role_name).await?;

        let inserted = self
            .authorization_store
            .assign_user_role(&self.db, &user.id, role.id)
            .await?;

        if inserted {
            tracing::info!("Assigned role '{}' to user '{}'", role.name, user.username);
            Ok(AssignOutcome::Assigned)
        } else {
            tracing::debug!("User '{}' already has role '{}'", user.username, role.name);
            Ok(AssignOutcome::AlreadyAssigned)
        }
    }

    /// Take `role` away from `username`
    pub async fn remove_role(&self, username: &str, role_name: &str) -> Result<RemoveOutcome, InternalError> {
        let (user, role) = self.resolve(username, role_name).await?;

        let deleted = self
            .authorization_store
            .remove_user_role(&self.db, &user.id, role.id)
            .await?;

        if deleted {
            tracing::info!("Removed role '{}' from user '{}'", role.name, user.username);
            Ok(RemoveOutcome::Removed)
        } else {
            tracing::debug!("User '{}' does not have role '{}'", user.username, role.name);
            Ok(RemoveOutcome::NotAssigned)
        }
    }

    /// `assign_role` with the audit entry a gated caller should record
    ///
    /// No entry is requested when the user already held the role.
    pub async fn assign_role_audited(&self, username: &str, role_name: &str) -> ProviderResult<AssignOutcome> {
        let outcome = self.assign_role(username, role_name).await?;
        Ok(match outcome {
            AssignOutcome::Assigned => ActionOutcome::new(outcome, AuditIntent::role_assigned(role_name, username)),
            AssignOutcome::AlreadyAssigned => ActionOutcome::unchanged(outcome),
        })
    }

    pub async fn remove_role_audited(&self, username: &str, role_name: &str) -> ProviderResult<RemoveOutcome> {
        let outcome = self.remove_role(username, role_name).await?;
        Ok(match outcome {
            RemoveOutcome::Removed => ActionOutcome::new(outcome, AuditIntent::role_removed(role_name, username)),
            RemoveOutcome::NotAssigned => ActionOutcome::unchanged(outcome),
        })
    }

    /// Get-or-create every permission, role and role/permission link in `definitions`
    ///
    /// Definitions are validated before anything is written, and all writes share
    /// one transaction. Running it again reports every row as `Existing`.
    pub async fn bootstrap_roles_and_permissions(
        &self,
        definitions: &RbacDefinitions,
    ) -> Result<BootstrapReport, InternalError> {
        definitions.validate()?;

        let txn = begin_transaction(&self.db).await?;
        let store = &self.authorization_store;
        let mut report = BootstrapReport::default();

        for name in &definitions.permissions {
            let provisioned = store.get_or_create_permission(&txn, name).await?;
            report.permissions.push(name_of(&provisioned, name));
        }

        for definition in &definitions.roles {
            let role = store.get_or_create_role(&txn, &definition.name).await?;
            let role_id = role.value().id;
            report.roles.push(name_of(&role, &definition.name));

            for permission_name in &definition.permissions {
                let permission = store
                    .find_permission(&txn, permission_name)
                    .await?
                    .ok_or_else(|| AdministrationError::PermissionNotFound {
                        permission: permission_name.clone(),
                        role: definition.name.clone(),
                    })?;

                let link = RolePermissionLink {
                    role: definition.name.clone(),
                    permission: permission_name.clone(),
                };
                if store.link_role_permission(&txn, role_id, permission.id).await? {
                    report.links.push(Provisioned::Created(link));
                } else {
                    report.links.push(Provisioned::Existing(link));
                }
            }
        }

        commit_transaction(txn).await?;

        tracing::info!(
            "Role/permission bootstrap finished: {} rows created",
            report.created_count()
        );

        Ok(report)
    }

    async fn resolve(&self, username: &str, role_name: &str) -> Result<(user::Model, role::Model), InternalError> {
        let user = self
            .credential_store
            .find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| AdministrationError::UserNotFound {
                username: username.to_owned(),
            })?;

        let role = self
            .authorization_store
            .find_role(&self.db, role_name)
            .await?
            .ok_or_else(|| AdministrationError::RoleNotFound {
                role: role_name.to_owned(),
            })?;

        Ok((user, role))
    }
}

fn name_of<T>(provisioned: &Provisioned<T>, name: &str) -> Provisioned<String> {
    match provisioned {
        Provisioned::Created(_) => Provisioned::Created(name.to_owned()),
        Provisioned::Existing(_) => Provisioned::Existing(name.to_owned()),
    }
}
