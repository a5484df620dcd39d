//! E2E tests for the TickTick task source.
//!
//! Runs the real client against a local mock server: project discovery,
//! task mapping, token refresh and the error surface callers branch on.

use std::path::PathBuf;

use chrono::NaiveDate;
use daybrief_core::{Config, SourceError, TaskSource, TickTickClient, Tokens};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

fn test_config() -> Config {
    Config {
        ticktick_client_id: "cid".to_string(),
        ticktick_client_secret: "sec".to_string(),
        ..Config::default()
    }
}

fn fresh_tokens() -> Tokens {
    Tokens {
        access_token: "tok".to_string(),
        refresh_token: String::new(),
        expires_at: 0,
    }
}

fn client_for(server: &mockito::Server, tokens: Tokens, token_path: PathBuf) -> TickTickClient {
    TickTickClient::with_endpoints(
        &test_config(),
        tokens,
        token_path,
        &server.url(),
        &format!("{}/oauth/token", server.url()),
    )
}

/// The adapters resolve the async runtime through the ambient handle, so
/// each test enters one only around the client calls themselves.
fn with_runtime<T>(f: impl FnOnce() -> T) -> T {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _guard = rt.enter();
    f()
}

/// Test: fetch_all walks the project list and maps raw tasks.
#[test]
fn test_fetch_all_maps_projects_and_tasks() {
    let mut server = mockito::Server::new();
    let projects = server
        .mock("GET", "/project")
        .match_header("authorization", "Bearer tok")
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "p1", "name": "Engineering"},
                {"id": "p2", "name": "Home"},
            ])
            .to_string(),
        )
        .create();
    let p1_data = server
        .mock("GET", "/project/p1/data")
        .with_header("content-type", "application/json")
        .with_body(
            json!({"tasks": [
                {"id": "t1", "title": "Ship report", "priority": 5,
                 "dueDate": "2025-03-10T00:00:00+0000"},
                {"title": "has no id, must be skipped"},
            ]})
            .to_string(),
        )
        .create();
    let p2_data = server
        .mock("GET", "/project/p2/data")
        .with_header("content-type", "application/json")
        .with_body(json!({"tasks": [{"id": "t2", "title": "Book flights", "priority": 1}]}).to_string())
        .create();

    let dir = TempDir::new().unwrap();
    let mut client = client_for(&server, fresh_tokens(), dir.path().join("tokens.json"));
    let tasks = with_runtime(|| client.fetch_all()).unwrap();

    assert_eq!(tasks.len(), 2);
    let mut titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Book flights", "Ship report"]);

    let report = tasks.iter().find(|t| t.id == "t1").unwrap();
    assert_eq!(report.project_name, "Engineering");
    assert_eq!(report.priority, 5);
    assert_eq!(report.due_date, NaiveDate::from_ymd_opt(2025, 3, 10));

    projects.assert();
    p1_data.assert();
    p2_data.assert();
}

/// Test: a stale token refreshes first and the new tokens are persisted.
#[test]
fn test_refresh_flow_persists_tokens() {
    let mut server = mockito::Server::new();
    let refresh = server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "r1".into()),
            Matcher::UrlEncoded("client_id".into(), "cid".into()),
            Matcher::UrlEncoded("client_secret".into(), "sec".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"new-tok","refresh_token":"r2","expires_in":3600}"#)
        .create();
    let projects = server
        .mock("GET", "/project")
        .match_header("authorization", "Bearer new-tok")
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("tokens.json");
    let stale = Tokens {
        access_token: "stale-tok".to_string(),
        refresh_token: "r1".to_string(),
        expires_at: 1,
    };
    let mut client = client_for(&server, stale, token_path.clone());
    let tasks = with_runtime(|| client.fetch_all()).unwrap();
    assert!(tasks.is_empty());

    let saved = Tokens::load_from(&token_path);
    assert_eq!(saved.access_token, "new-tok");
    assert_eq!(saved.refresh_token, "r2");
    assert!(saved.expires_at > chrono::Utc::now().timestamp());

    refresh.assert();
    projects.assert();
}

/// Test: a rejected refresh surfaces as an auth failure, not a transport one.
#[test]
fn test_refresh_failure_is_auth_error() {
    let mut server = mockito::Server::new();
    let refresh = server
        .mock("POST", "/oauth/token")
        .with_status(400)
        .with_body("invalid_grant")
        .create();

    let dir = TempDir::new().unwrap();
    let stale = Tokens {
        access_token: "stale-tok".to_string(),
        refresh_token: "r1".to_string(),
        expires_at: 1,
    };
    let mut client = client_for(&server, stale, dir.path().join("tokens.json"));
    let err = with_runtime(|| client.fetch_all()).unwrap_err();

    assert!(err.is_auth());
    match err {
        SourceError::TokenRefreshFailed(body) => assert!(body.contains("invalid_grant")),
        other => panic!("expected TokenRefreshFailed, got {other:?}"),
    }

    refresh.assert();
}

/// Test: an API rejection mid-fetch propagates as an HTTP error.
#[test]
fn test_api_error_propagates_as_http() {
    let mut server = mockito::Server::new();
    let projects = server
        .mock("GET", "/project")
        .with_status(401)
        .with_body("token revoked")
        .create();

    let dir = TempDir::new().unwrap();
    let mut client = client_for(&server, fresh_tokens(), dir.path().join("tokens.json"));
    let err = with_runtime(|| client.fetch_all()).unwrap_err();

    assert!(!err.is_auth());
    assert!(matches!(err, SourceError::Http(_)));
    assert!(err.to_string().contains("401"));

    projects.assert();
}

/// Test: the inbox project is found regardless of its casing.
#[test]
fn test_inbox_lookup_is_case_insensitive() {
    let mut server = mockito::Server::new();
    let projects = server
        .mock("GET", "/project")
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "inb", "name": "INBOX"},
                {"id": "p1", "name": "Work"},
            ])
            .to_string(),
        )
        .create();
    let inbox_data = server
        .mock("GET", "/project/inb/data")
        .with_header("content-type", "application/json")
        .with_body(json!({"tasks": [{"id": "t9", "title": "Sort receipts"}]}).to_string())
        .create();

    let dir = TempDir::new().unwrap();
    let mut client = client_for(&server, fresh_tokens(), dir.path().join("tokens.json"));
    let inbox = with_runtime(|| client.fetch_inbox()).unwrap();

    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Sort receipts");
    assert_eq!(inbox[0].project_name, "Inbox");

    projects.assert();
    inbox_data.assert();
}

/// Test: no inbox project means an empty inbox, not an error.
#[test]
fn test_missing_inbox_project_yields_empty() {
    let mut server = mockito::Server::new();
    let projects = server
        .mock("GET", "/project")
        .with_header("content-type", "application/json")
        .with_body(json!([{"id": "p1", "name": "Work"}]).to_string())
        .create();

    let dir = TempDir::new().unwrap();
    let mut client = client_for(&server, fresh_tokens(), dir.path().join("tokens.json"));
    let inbox = with_runtime(|| client.fetch_inbox()).unwrap();

    assert!(inbox.is_empty());
    projects.assert();
}

/// Test: without an access token the client fails before any request.
#[test]
fn test_missing_access_token_short_circuits() {
    let dir = TempDir::new().unwrap();
    // Dead endpoints and no runtime: the call must not get far enough to
    // need either.
    let mut client = TickTickClient::with_endpoints(
        &test_config(),
        Tokens::default(),
        dir.path().join("tokens.json"),
        "http://127.0.0.1:1",
        "http://127.0.0.1:1/oauth/token",
    );

    let err = client.fetch_all().unwrap_err();
    assert!(err.is_auth());
    assert!(matches!(
        err,
        SourceError::NotAuthenticated { ref service, .. } if service == "TickTick"
    ));
}
