use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::errors::InternalError;
use crate::stores::AuthorizationStore;

/// Live role and permission lookups for a user
///
/// Answers always reflect committed storage state at the time of the call.
pub struct AuthorizationProvider {
    db: DatabaseConnection,
    store: Arc<AuthorizationStore>,
}

impl AuthorizationProvider {
    pub fn new(db: DatabaseConnection, store: Arc<AuthorizationStore>) -> Self {
        Self { db, store }
    }

    pub async fn roles_of(&self, user_id: &str) -> Result<BTreeSet<String>, InternalError> {
        self.store.roles_of(&self.db, user_id).await
    }

    /// Effective permission set; empty for a user without roles
    pub async fn permissions_of(&self, user_id: &str) -> Result<BTreeSet<String>, InternalError> {
        self.store.permissions_of(&self.db, user_id).await
    }

    pub async fn has_role(&self, user_id: &str, role: &str) -> Result<bool, InternalError> {
        Ok(self.roles_of(user_id).await?.contains(role))
    }

    pub async fn has_permission(&self, user_id: &str, permission: &str) -> Result<bool, InternalError> {
        Ok(self.permissions_of(user_id).await?.contains(permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, seed_default_roles, setup_test_db};

    #[tokio::test]
    async fn admin_and_user_roles_resolve_to_their_permissions() {
        let db = setup_test_db().await;
        seed_default_roles(&db).await;
        let store = Arc::new(AuthorizationStore::new());
        let provider = AuthorizationProvider::new(db.clone(), store.clone());
        let alice = insert_test_user(&db, "alice").await;
        let bob = insert_test_user(&db, "bob").await;
        let admin = store.find_role(&db, "admin").await.unwrap().unwrap();
        let user = store.find_role(&db, "user").await.unwrap().unwrap();
        store.assign_user_role(&db, &alice, admin.id).await.unwrap();
        store.assign_user_role(&db, &bob, user.id).await.unwrap();

        assert!(provider.has_permission(&alice, "delete").await.unwrap());
        assert!(provider.has_role(&alice, "admin").await.unwrap());
        assert!(provider.has_permission(&bob, "read").await.unwrap());
        assert!(!provider.has_permission(&bob, "delete").await.unwrap());
        assert!(!provider.has_role(&bob, "admin").await.unwrap());
    }

    #[tokio::test]
    async fn removal_is_visible_on_the_next_check() {
        let db = setup_test_db().await;
        seed_default_roles(&db).await;
        let store = Arc::new(AuthorizationStore::new());
        let provider = AuthorizationProvider::new(db.clone(), store.clone());
        let carol = insert_test_user(&db, "carol").await;
        let admin = store.find_role(&db, "admin").await.unwrap().unwrap();

        store.assign_user_role(&db, &carol, admin.id).await.unwrap();
        assert!(provider.has_permission(&carol, "update").await.unwrap());

        store.remove_user_role(&db, &carol, admin.id).await.unwrap();
        assert!(!provider.has_permission(&carol, "update").await.unwrap());
        assert!(provider.permissions_of(&carol).await.unwrap().is_empty());
    }
}
