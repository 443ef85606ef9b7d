mod common;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use todo_client::auth::{Authenticator, HttpAuthApi};
use todo_client::routes::{self, RecordingNavigator};
use todo_client::{AppError, Config, CreateTaskRequest, SessionStore, TodoClient, User};

use common::StubServer;

fn authenticator(server: &StubServer) -> (Authenticator, Arc<RecordingNavigator>) {
    let config = Config::new(&server.base_url).unwrap();
    let navigator = Arc::new(RecordingNavigator::new());
    let auth = Authenticator::new(
        Arc::new(HttpAuthApi::new(&config).unwrap()),
        SessionStore::in_memory(),
        navigator.clone(),
    );
    (auth, navigator)
}

#[test_log::test(actix_rt::test)]
async fn test_sign_up_stores_profile_from_backend() {
    let server = common::start().await;
    let (auth, _) = authenticator(&server);

    let user = auth
        .sign_up("ada@example.com", "Password1", "Ada Lovelace")
        .await
        .unwrap();

    assert_eq!(user, User::basic("1", "ada@example.com", "Ada Lovelace"));
    assert_eq!(auth.session().user().unwrap(), Some(user));
    let token = auth.session().token().unwrap().unwrap();
    assert!(token.starts_with("token-"));
    assert_eq!(
        server.backend.requests(),
        vec!["POST /auth/register", "GET /auth/me"]
    );

    server.stop().await;
}

#[actix_rt::test]
async fn test_sign_up_twice_is_rejected() {
    let server = common::start().await;
    let (auth, _) = authenticator(&server);

    auth.sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap();
    let err = auth
        .sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));

    server.stop().await;
}

#[actix_rt::test]
async fn test_sign_in_falls_back_when_profile_unavailable() {
    let server = common::start().await;
    let (auth, _) = authenticator(&server);
    auth.sign_up("grace.hopper@example.com", "Password1", "Grace")
        .await
        .unwrap();
    auth.sign_out().await.unwrap();

    server.backend.fail_me(true);
    let user = auth
        .sign_in("grace.hopper@example.com", "Password1")
        .await
        .unwrap();

    assert_eq!(user, User::basic("1", "grace.hopper@example.com", "grace.hopper"));
    assert!(auth.session().is_authenticated());

    server.stop().await;
}

#[actix_rt::test]
async fn test_sign_in_wrong_password() {
    let server = common::start().await;
    let (auth, navigator) = authenticator(&server);
    auth.sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap();
    auth.sign_out().await.unwrap();

    let err = auth
        .sign_in("ada@example.com", "Password2")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Failed to sign in: 401 Unauthorized");
    assert!(!auth.session().is_authenticated());
    // Only protected task requests redirect
    assert!(navigator.redirects().is_empty());

    server.stop().await;
}

#[actix_rt::test]
async fn test_sign_out_clears_session_when_backend_fails() {
    let server = common::start().await;
    let (auth, _) = authenticator(&server);
    auth.sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap();

    server.backend.fail_logout(true);
    auth.sign_out().await.unwrap();

    assert!(auth.session().token().unwrap().is_none());
    assert!(auth.session().user().unwrap().is_none());
    assert!(server
        .backend
        .requests()
        .contains(&"POST /auth/logout".to_string()));

    server.stop().await;
}

#[actix_rt::test]
async fn test_current_user_paths() {
    let server = common::start().await;
    let (auth, navigator) = authenticator(&server);
    let signed_up = auth
        .sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap();

    // Fresh from the backend
    assert_eq!(auth.current_user().await.unwrap(), signed_up);

    // Backend trouble serves the cached copy
    server.backend.fail_me(true);
    assert_eq!(auth.current_user().await.unwrap(), signed_up);
    assert!(auth.session().is_authenticated());

    // A rejected token ends the session
    server.backend.fail_me(false);
    server.backend.revoke_all_tokens();
    let err = auth.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!auth.session().is_authenticated());
    assert_eq!(navigator.redirects(), vec![routes::SIGNIN]);

    assert!(matches!(
        auth.current_user().await,
        Err(AppError::Unauthenticated(_))
    ));

    server.stop().await;
}

#[actix_rt::test]
async fn test_session_file_survives_restart() {
    let server = common::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let config = Config::new(&server.base_url).unwrap();

    let first = TodoClient::from_config(
        &config,
        SessionStore::file(&path),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    first
        .auth()
        .sign_up("ada@example.com", "Password1", "Ada")
        .await
        .unwrap();
    let task = first
        .tasks()
        .create_task(CreateTaskRequest::new("Persist me"))
        .await
        .unwrap();

    let second = TodoClient::from_config(
        &config,
        SessionStore::file(&path),
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    assert!(second.session().is_authenticated());
    assert_eq!(second.tasks().list_tasks().await.unwrap(), vec![task]);

    second.auth().sign_out().await.unwrap();
    assert!(!first.session().is_authenticated());

    server.stop().await;
}
