use std::collections::BTreeSet;

use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::types::db::{permission, role, role_permission, user_role};
use crate::types::internal::rbac::Provisioned;

/// Roles, permissions and the two link tables
///
/// Every read goes to storage; nothing here is cached. Get-or-create helpers insert
/// with `ON CONFLICT DO NOTHING` and then re-read, so racing callers converge on one row.
pub struct AuthorizationStore {}

impl AuthorizationStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Names of all roles held by the user
    pub async fn roles_of(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<BTreeSet<String>, InternalError> {
        let names: Vec<String> = role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .select_only()
            .column(role::Column::Name)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("roles_of", e))?;

        Ok(names.into_iter().collect())
    }

    /// Union of the permissions of every role the user holds, in one query
    pub async fn permissions_of(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<BTreeSet<String>, InternalError> {
        let users_roles = Query::select()
            .column(user_role::Column::RoleId)
            .from(user_role::Entity)
            .and_where(user_role::Column::UserId.eq(user_id))
            .to_owned();

        let names: Vec<String> = permission::Entity::find()
            .join(JoinType::InnerJoin, permission::Relation::RolePermission.def())
            .filter(role_permission::Column::RoleId.in_subquery(users_roles))
            .select_only()
            .column(permission::Column::Name)
            .distinct()
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permissions_of", e))?;

        Ok(names.into_iter().collect())
    }

    pub async fn find_role(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role", e))
    }

    pub async fn find_permission(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<permission::Model>, InternalError> {
        permission::Entity::find()
            .filter(permission::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission", e))
    }

    pub async fn get_or_create_role(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Provisioned<role::Model>, InternalError> {
        let inserted = role::Entity::insert(role::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        })
        .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("insert_role", e))?;

        let model = self.find_role(conn, name).await?.ok_or_else(|| {
            InternalError::database("reread_role", DbErr::RecordNotFound(format!("role '{}'", name)))
        })?;

        Ok(if inserted > 0 {
            Provisioned::Created(model)
        } else {
            Provisioned::Existing(model)
        })
    }

    pub async fn get_or_create_permission(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Provisioned<permission::Model>, InternalError> {
        let inserted = permission::Entity::insert(permission::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        })
        .on_conflict(OnConflict::column(permission::Column::Name).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("insert_permission", e))?;

        let model = self.find_permission(conn, name).await?.ok_or_else(|| {
            InternalError::database("reread_permission", DbErr::RecordNotFound(format!("permission '{}'", name)))
        })?;

        Ok(if inserted > 0 {
            Provisioned::Created(model)
        } else {
            Provisioned::Existing(model)
        })
    }

    /// Link a permission to a role; `true` when the link did not exist yet
    pub async fn link_role_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i32,
        permission_id: i32,
    ) -> Result<bool, InternalError> {
        let inserted = role_permission::Entity::insert(role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        })
        .on_conflict(
            OnConflict::columns([role_permission::Column::RoleId, role_permission::Column::PermissionId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("link_role_permission", e))?;

        Ok(inserted > 0)
    }

    /// Give a role to a user; `true` when the user did not hold it yet
    pub async fn assign_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        role_id: i32,
    ) -> Result<bool, InternalError> {
        let inserted = user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(user_id.to_owned()),
            role_id: Set(role_id),
        })
        .on_conflict(
            OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| InternalError::database("assign_user_role", e))?;

        Ok(inserted > 0)
    }

    /// Take a role away from a user; `true` when a row was deleted
    pub async fn remove_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        role_id: i32,
    ) -> Result<bool, InternalError> {
        let result = user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("remove_user_role", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Row counts of (permissions, roles, role_permissions)
    pub async fn catalog_counts(&self, conn: &impl ConnectionTrait) -> Result<(u64, u64, u64), InternalError> {
        let permissions = permission::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_permissions", e))?;
        let roles = role::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_roles", e))?;
        let links = role_permission::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_role_permissions", e))?;

        Ok((permissions, roles, links))
    }
}

impl Default for AuthorizationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};

    async fn role_with(
        store: &AuthorizationStore,
        db: &sea_orm::DatabaseConnection,
        role: &str,
        permissions: &[&str],
    ) -> i32 {
        let role = store.get_or_create_role(db, role).await.unwrap().value().clone();
        for name in permissions {
            let permission = store.get_or_create_permission(db, name).await.unwrap().value().clone();
            store.link_role_permission(db, role.id, permission.id).await.unwrap();
        }
        role.id
    }

    #[tokio::test]
    async fn user_without_roles_has_no_permissions() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();
        let user_id = insert_test_user(&db, "nobody").await;

        assert!(store.roles_of(&db, &user_id).await.unwrap().is_empty());
        assert!(store.permissions_of(&db, &user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn permissions_are_the_union_over_roles() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();
        let user_id = insert_test_user(&db, "carol").await;
        let reader = role_with(&store, &db, "reader", &["read"]).await;
        let editor = role_with(&store, &db, "editor", &["read", "update"]).await;

        store.assign_user_role(&db, &user_id, reader).await.unwrap();
        store.assign_user_role(&db, &user_id, editor).await.unwrap();

        let permissions = store.permissions_of(&db, &user_id).await.unwrap();
        let roles = store.roles_of(&db, &user_id).await.unwrap();

        assert_eq!(permissions, BTreeSet::from(["read".to_string(), "update".to_string()]));
        assert_eq!(roles, BTreeSet::from(["editor".to_string(), "reader".to_string()]));
    }

    #[tokio::test]
    async fn permissions_of_other_users_do_not_leak() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();
        let admin = insert_test_user(&db, "admin-user").await;
        let plain = insert_test_user(&db, "plain-user").await;
        let admin_role = role_with(&store, &db, "admin", &["read", "delete"]).await;

        store.assign_user_role(&db, &admin, admin_role).await.unwrap();

        assert!(store.permissions_of(&db, &plain).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_or_create_reports_existing_rows() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();

        let first = store.get_or_create_role(&db, "admin").await.unwrap();
        let second = store.get_or_create_role(&db, "admin").await.unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(first.value().id, second.value().id);
    }

    #[tokio::test]
    async fn duplicate_links_are_not_inserted() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();
        let role = store.get_or_create_role(&db, "user").await.unwrap().value().clone();
        let permission = store.get_or_create_permission(&db, "read").await.unwrap().value().clone();

        assert!(store.link_role_permission(&db, role.id, permission.id).await.unwrap());
        assert!(!store.link_role_permission(&db, role.id, permission.id).await.unwrap());
        assert_eq!(store.catalog_counts(&db).await.unwrap(), (1, 1, 1));
    }

    #[tokio::test]
    async fn assign_and_remove_report_whether_anything_changed() {
        let db = setup_test_db().await;
        let store = AuthorizationStore::new();
        let user_id = insert_test_user(&db, "dave").await;
        let role = role_with(&store, &db, "user", &["read"]).await;

        assert!(store.assign_user_role(&db, &user_id, role).await.unwrap());
        assert!(!store.assign_user_role(&db, &user_id, role).await.unwrap());
        assert!(store.remove_user_role(&db, &user_id, role).await.unwrap());
        assert!(!store.remove_user_role(&db, &user_id, role).await.unwrap());
    }
}
