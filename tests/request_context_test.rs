mod common;

use media_explorer_backend::types::internal::context::{RequestContext, RequestSource};

#[tokio::test]
async fn logged_in_context_carries_identity() {
    let app_data = common::setup_app().await;
    let user_id = common::register(&app_data, "carol", "password1").await;

    let ctx = common::logged_in(&app_data, "carol", "password1").await;

    assert!(ctx.is_authenticated());
    assert_eq!(ctx.user_id(), Some(user_id.as_str()));
}

#[tokio::test]
async fn token_resolves_back_to_the_same_identity() {
    let app_data = common::setup_app().await;
    common::register(&app_data, "carol", "password1").await;
    let authenticated = app_data.session_provider.authenticate("carol", "password1").await.unwrap();

    let identity = app_data.session_provider.resolve(&authenticated.token).await;

    assert_eq!(identity, Some(authenticated.identity));
}

#[test]
fn cli_context_is_unauthenticated() {
    let ctx = RequestContext::for_cli("assign-role");

    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.source, RequestSource::CLI);
    assert!(ctx.user_id().is_none());
}
