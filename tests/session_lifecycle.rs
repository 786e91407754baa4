#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::{bail, Result};
use libris::{
    client::{ApiClient, ApiError, RequestDescriptor, DEFAULT_TIMEOUT, REFRESH_PATH},
    session::{AuthError, SessionManager, LOGIN_PATH, LOGOUT_PATH},
    store::{FileTokenStore, MemoryTokenStore, Role, TokenStore, User},
};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::{net::TcpListener, sync::Arc};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn alex() -> User {
    User {
        username: "alex".to_string(),
        email: "alex@college.edu".to_string(),
        role: Role::Student,
        is_approved: true,
    }
}

fn signed_in(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    let store = Arc::new(MemoryTokenStore::new());
    store.set(SecretString::from(access), SecretString::from(refresh), alex());
    store
}

fn manager(server: &MockServer, store: Arc<dyn TokenStore>) -> SessionManager {
    let url = Url::parse(&server.uri()).unwrap();
    SessionManager::new(ApiClient::new(&url, DEFAULT_TIMEOUT, store).unwrap())
}

fn login_body(role: &str) -> serde_json::Value {
    json!({
        "access": "A1",
        "refresh": "R1",
        "user": {"username": "alex", "email": "alex@college.edu", "role": role, "is_approved": true}
    })
}

#[tokio::test]
async fn expired_access_token_is_refreshed_and_replayed_once() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/borrow/stats/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/borrow/stats/"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"borrowedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let session = manager(&server, store.clone());

    let response = session
        .client()
        .execute(RequestDescriptor::get("/api/borrow/stats/"))
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"borrowedCount": 1}));

    let stored = store.get().expect("session kept");
    assert_eq!(stored.access_token.expose_secret(), "A2");
    assert_eq!(stored.refresh_token.expose_secret(), "R1");
    assert_eq!(stored.user, alex());

    let Some(requests) = server.received_requests().await else {
        bail!("wiremock request recording is disabled");
    };
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[2]
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok()),
        Some("Bearer A2")
    );
    Ok(())
}

#[tokio::test]
async fn replayed_request_rejected_again_is_not_refreshed_twice() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/borrow/history/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "nope"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let session = manager(&server, store.clone());

    let err = session
        .client()
        .execute(RequestDescriptor::get("/api/borrow/history/"))
        .await
        .expect_err("replay rejected");

    assert!(matches!(err, ApiError::Http { status, .. } if status == StatusCode::UNAUTHORIZED));
    assert!(!err.is_session_ended());
    // the replay failure is returned as-is; the refreshed session stays
    assert!(store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn failed_refresh_ends_session_for_all_observers() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/borrow/borrow/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let session = manager(&server, store.clone());
    assert!(session.initialize().is_authenticated);
    let mut state = session.subscribe();

    let err = session
        .client()
        .execute(RequestDescriptor::get("/api/borrow/borrow/"))
        .await
        .expect_err("refresh rejected");

    assert!(err.is_session_ended());
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(store.get().is_none());
    assert!(!session.is_authenticated());

    assert!(state.has_changed()?);
    let current = state.borrow_and_update().clone();
    assert!(!current.is_authenticated);
    assert!(current.user.is_none());
    Ok(())
}

#[tokio::test]
async fn logout_clears_store_when_backend_fails() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in("A1", "R1");
    let session = manager(&server, store.clone());
    session.initialize();

    session.logout().await;

    assert!(store.get().is_none());
    assert!(!session.state().is_authenticated);
    assert!(!session.state().loading);
    Ok(())
}

#[tokio::test]
async fn logout_clears_store_when_backend_unreachable() {
    // nothing listens on the discard port
    let url = Url::parse("http://127.0.0.1:9").unwrap();
    let store = signed_in("A1", "R1");
    let dyn_store: Arc<dyn TokenStore> = store.clone();
    let session = SessionManager::new(ApiClient::new(&url, DEFAULT_TIMEOUT, dyn_store).unwrap());

    session.logout().await;

    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn administrator_entry_rejects_student_account() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("student")))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = manager(&server, store.clone());

    let err = session
        .login_as("alex", &SecretString::from("hunter22"), Role::Administrator)
        .await
        .expect_err("student at admin entry");
    assert_eq!(
        err,
        AuthError::RoleMismatch {
            expected: Role::Administrator,
            actual: Role::Student
        }
    );
    assert!(store.get().is_none());

    // a prior session is left exactly as it was
    store.set(SecretString::from("A0"), SecretString::from("R0"), alex());
    let _ = session
        .login_as("alex", &SecretString::from("hunter22"), Role::Administrator)
        .await;
    let kept = store.get().expect("prior session kept");
    assert_eq!(kept.access_token.expose_secret(), "A0");
    assert_eq!(kept.refresh_token.expose_secret(), "R0");

    let session_ok = session
        .login_as("alex", &SecretString::from("hunter22"), Role::Student)
        .await?;
    assert_eq!(session_ok.access_token.expose_secret(), "A1");
    Ok(())
}

#[tokio::test]
async fn login_survives_restart_with_file_store() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("administrator")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard/stats/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stats": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let session_file = dir.path().join("session.json");

    let first = manager(&server, Arc::new(FileTokenStore::open(&session_file)));
    first
        .login_as("root", &SecretString::from("pw"), Role::Administrator)
        .await?;

    // a new process reads the same file
    let second = manager(&server, Arc::new(FileTokenStore::open(&session_file)));
    let state = second.initialize();
    assert!(state.is_authenticated);
    assert!(second.is_administrator());

    second
        .client()
        .execute(RequestDescriptor::get("/api/admin/dashboard/stats/"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn requests_without_session_are_sent_unauthenticated() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Fiction"])))
        .mount(&server)
        .await;

    let session = manager(&server, Arc::new(MemoryTokenStore::new()));
    let response = session
        .client()
        .execute(RequestDescriptor::get("/api/books/categories/"))
        .await?;
    assert_eq!(response.body, json!(["Fiction"]));

    let Some(requests) = server.received_requests().await else {
        bail!("wiremock request recording is disabled");
    };
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("x-request-id").is_some());
    Ok(())
}
