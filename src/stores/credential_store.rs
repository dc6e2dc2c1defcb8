use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::CryptoProvider;
use crate::types::PasswordHash;
use crate::types::db::user;
use crate::types::internal::user::User;

/// User identities and their password hashes
///
/// UNIQUE indexes on username and email are authoritative; the lookups done before
/// an insert only exist to produce the right error without touching the constraint.
pub struct CredentialStore {
    crypto_provider: Arc<CryptoProvider>,
}

impl CredentialStore {
    pub fn new(crypto_provider: Arc<CryptoProvider>) -> Self {
        Self { crypto_provider }
    }

    /// Insert a new user with an already computed password hash
    ///
    /// # Returns
    /// * `Ok(String)` - The user_id (UUID) of the created user
    /// * `Err(InternalError)` - DuplicateUsername, DuplicateEmail or a database error
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<String, InternalError> {
        if self.find_by_username(conn, username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(username.to_owned()).into());
        }

        let email_taken = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?
            .is_some();
        if email_taken {
            return Err(CredentialError::DuplicateEmail(email.to_owned()).into());
        }

        let user_id = Uuid::new_v4().to_string();
        let new_user = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash.0),
            created_at: Set(Utc::now().timestamp()),
        };

        // Lost a race with a concurrent registration if this hits a UNIQUE index
        new_user
            .insert(conn)
            .await
            .map_err(|e| insert_error(e, username, email))?;

        tracing::info!("Created user {} ({})", username, user_id);
        Ok(user_id)
    }

    /// Exact-match lookup, no case folding
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<User>, InternalError> {
        let user = user::Entity::find_by_id(user_id.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))?;

        Ok(user.map(User::from))
    }

    /// Check a username/password pair
    ///
    /// Unknown username and wrong password both end in `InvalidCredentials`, and both
    /// pay for one Argon2 verification.
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<User, InternalError> {
        let Some(user) = self.find_by_username(conn, username).await? else {
            self.crypto_provider.verify_dummy(password).await?;
            return Err(CredentialError::InvalidCredentials.into());
        };

        if self.crypto_provider.verify_password(&user.password_hash, password).await? {
            Ok(User::from(user))
        } else {
            Err(CredentialError::InvalidCredentials.into())
        }
    }
}

/// Map a failed `users` insert back to the duplicate it reports
fn insert_error(err: DbErr, username: &str, email: &str) -> InternalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("email") => {
            CredentialError::DuplicateEmail(email.to_owned()).into()
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => CredentialError::DuplicateUsername(username.to_owned()).into(),
        _ => InternalError::database("insert_user", err),
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("crypto_provider", &self.crypto_provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_test_db, test_crypto_provider};

    async fn setup() -> (sea_orm::DatabaseConnection, CredentialStore, Arc<CryptoProvider>) {
        let db = setup_test_db().await;
        let crypto = test_crypto_provider();
        (db, CredentialStore::new(crypto.clone()), crypto)
    }

    #[tokio::test]
    async fn test_create_user_then_verify_credentials() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("correctpass").await.unwrap();

        let user_id = store.create_user(&db, "validuser", "valid@example.com", hash).await.unwrap();
        let user = store.verify_credentials(&db, "validuser", "correctpass").await.unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "valid@example.com");
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plaintext() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("mysecretpassword").await.unwrap();

        store.create_user(&db, "testuser", "t@example.com", hash).await.unwrap();
        let stored = store.find_by_username(&db, "testuser").await.unwrap().unwrap();

        assert_ne!(stored.password_hash, "mysecretpassword");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("password1").await.unwrap();
        store.create_user(&db, "duplicate", "a@example.com", hash.clone()).await.unwrap();

        let result = store.create_user(&db, "duplicate", "b@example.com", hash).await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::DuplicateUsername(ref name))) if name == "duplicate"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("password1").await.unwrap();
        store.create_user(&db, "first", "shared@example.com", hash.clone()).await.unwrap();

        let result = store.create_user(&db, "second", "shared@example.com", hash).await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::DuplicateEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("correctpass").await.unwrap();
        store.create_user(&db, "validuser", "v@example.com", hash).await.unwrap();

        let wrong_password = store.verify_credentials(&db, "validuser", "wrongpass").await.unwrap_err();
        let unknown_user = store.verify_credentials(&db, "nonexistent", "wrongpass").await.unwrap_err();

        assert!(matches!(wrong_password, InternalError::Credential(CredentialError::InvalidCredentials)));
        assert!(matches!(unknown_user, InternalError::Credential(CredentialError::InvalidCredentials)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let (db, store, crypto) = setup().await;
        let hash = crypto.hash_password("correctpass").await.unwrap();
        store.create_user(&db, "Alice", "alice@example.com", hash).await.unwrap();

        assert!(store.find_by_username(&db, "alice").await.unwrap().is_none());
        assert!(store.verify_credentials(&db, "alice", "correctpass").await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_id_returns_none_for_unknown_id() {
        let (db, store, _) = setup().await;

        assert!(store.find_by_id(&db, "no-such-id").await.unwrap().is_none());
    }
    // Inserts straight into `users`, skipping the lookups create_user does first
    async fn raw_insert(db: &sea_orm::DatabaseConnection, username: &str, email: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set("$argon2id$placeholder".to_owned()),
            created_at: Set(0),
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_unique_violation_on_email_maps_to_duplicate_email() {
        let (db, _, _) = setup().await;
        raw_insert(&db, "first", "race@example.com").await.unwrap();
        let err = raw_insert(&db, "second", "race@example.com").await.unwrap_err();

        let mapped = insert_error(err, "second", "race@example.com");

        assert!(matches!(
            mapped,
            InternalError::Credential(CredentialError::DuplicateEmail(ref email)) if email == "race@example.com"
        ));
    }

    #[tokio::test]
    async fn test_unique_violation_on_username_maps_to_duplicate_username() {
        let (db, _, _) = setup().await;
        raw_insert(&db, "racer", "one@example.com").await.unwrap();
        let err = raw_insert(&db, "racer", "two@example.com").await.unwrap_err();

        let mapped = insert_error(err, "racer", "two@example.com");

        assert!(matches!(
            mapped,
            InternalError::Credential(CredentialError::DuplicateUsername(ref name)) if name == "racer"
        ));
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let mapped = insert_error(DbErr::Custom("disk full".to_string()), "racer", "two@example.com");

        assert!(matches!(mapped, InternalError::Database(_)));
    }
}
