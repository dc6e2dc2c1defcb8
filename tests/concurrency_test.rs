mod common;

use media_explorer_backend::types::internal::rbac::{AssignOutcome, RbacDefinitions};

const WORKERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_provisioning_creates_each_row_once() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("concurrent.db").display());
    let app_data = common::build_app(&url).await;

    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let app_data = app_data.clone();
        handles.push(tokio::spawn(async move {
            app_data
                .role_admin
                .bootstrap_roles_and_permissions(&RbacDefinitions::default())
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        let report = handle.await.unwrap().expect("bootstrap should not fail under contention");
        created += report.created_count();
    }

    // 4 permissions, 2 roles, 5 links
    assert_eq!(created, 11);
    assert_eq!(
        app_data.authorization_store.catalog_counts(&app_data.db).await.unwrap(),
        (4, 2, 5)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_assignment_of_one_role_yields_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("concurrent.db").display());
    let app_data = common::build_app(&url).await;
    app_data
        .role_admin
        .bootstrap_roles_and_permissions(&RbacDefinitions::default())
        .await
        .unwrap();
    let user_id = common::register(&app_data, "zed", "password1").await;

    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let app_data = app_data.clone();
        handles.push(tokio::spawn(async move {
            app_data.role_admin.assign_role("zed", "admin").await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().expect("assignment should not fail under contention"));
    }

    let assigned = outcomes.iter().filter(|outcome| **outcome == AssignOutcome::Assigned).count();
    assert_eq!(assigned, 1);
    assert_eq!(outcomes.len() - assigned, WORKERS - 1);
    assert_eq!(app_data.authorization_provider.roles_of(&user_id).await.unwrap().len(), 1);
}
