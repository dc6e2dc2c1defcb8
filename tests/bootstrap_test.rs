mod common;

use std::io::Write;

use media_explorer_backend::errors::InternalError;
use media_explorer_backend::errors::internal::AdministrationError;
use media_explorer_backend::types::internal::rbac::RbacDefinitions;

#[tokio::test]
async fn bootstrapping_twice_changes_nothing() {
    let app_data = common::setup_app().await;
    let store = &app_data.authorization_store;
    let before = store.catalog_counts(&app_data.db).await.unwrap();

    let report = app_data
        .role_admin
        .bootstrap_roles_and_permissions(&RbacDefinitions::default())
        .await
        .unwrap();

    assert_eq!(report.created_count(), 0);
    assert_eq!(store.catalog_counts(&app_data.db).await.unwrap(), before);
    assert_eq!(before, (4, 2, 5));
}

#[tokio::test]
async fn definitions_load_from_json_file() {
    let app_data = common::setup_app().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"permissions": ["read", "export"], "roles": [{{"name": "analyst", "permissions": ["read", "export"]}}]}}"#
    )
    .unwrap();

    let definitions = RbacDefinitions::from_file(file.path()).unwrap();
    let report = app_data
        .role_admin
        .bootstrap_roles_and_permissions(&definitions)
        .await
        .unwrap();

    // "export", "analyst" and both links are new; "read" already existed
    assert_eq!(report.created_count(), 4);
    assert_eq!(
        app_data.authorization_store.catalog_counts(&app_data.db).await.unwrap(),
        (5, 3, 7)
    );
}

#[tokio::test]
async fn unknown_permission_aborts_before_writing() {
    let app_data = common::setup_app().await;
    let before = app_data.authorization_store.catalog_counts(&app_data.db).await.unwrap();
    let definitions = RbacDefinitions::from_json_str(
        r#"{"permissions": ["archive"], "roles": [{"name": "archivist", "permissions": ["archive", "shred"]}]}"#,
    )
    .unwrap();

    let err = app_data
        .role_admin
        .bootstrap_roles_and_permissions(&definitions)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InternalError::Administration(AdministrationError::PermissionNotFound { .. })
    ));
    assert_eq!(
        app_data.authorization_store.catalog_counts(&app_data.db).await.unwrap(),
        before
    );
}
