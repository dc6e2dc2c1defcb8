#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::internal::{CredentialError, InternalError, RegistrationError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let internal_err = InternalError::database("find_user_by_username", db_err);
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_crypto_error_converts_to_internal_server_error() {
        let internal_err = InternalError::crypto("argon2_hash", "invalid secret");
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_invalid_credentials_converts_correctly() {
        let internal_err = InternalError::Credential(CredentialError::InvalidCredentials);
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::InvalidCredentials(_)));
        assert_eq!(auth_err.message(), "Invalid username or password");
    }

    #[test]
    fn test_duplicates_are_conflicts() {
        let username = AuthError::from_internal_error(InternalError::Credential(
            CredentialError::DuplicateUsername("alice".to_string()),
        ));
        let email = AuthError::from_internal_error(InternalError::Credential(
            CredentialError::DuplicateEmail("alice@example.com".to_string()),
        ));

        assert!(matches!(username, AuthError::DuplicateUsername(_)));
        assert!(matches!(email, AuthError::DuplicateEmail(_)));
        assert!(!username.message().contains("alice"));
    }

    #[test]
    fn test_registration_messages_are_kept_in_order() {
        let internal_err = InternalError::from(RegistrationError::Invalid(vec![
            "Username is required.".to_string(),
            "Passwords do not match.".to_string(),
        ]));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "Username is required. Passwords do not match.");
    }

    #[test]
    fn test_expired_token_asks_for_login() {
        let internal_err = InternalError::Credential(CredentialError::ExpiredToken("jwt".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::Unauthenticated(_)));
    }
}
