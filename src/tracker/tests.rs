use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};

use super::*;
use crate::ranking::Candidate;

fn issue_json(id: usize) -> Value {
    json!({
        "id": format!("{}", 10000 + id),
        "key": format!("PTP-{}", id),
        "fields": {
            "summary": format!("Issue {}", id),
            "description": {
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": format!("Body {}", id)}]}
                ]
            },
            "issuetype": {"name": "Task"}
        }
    })
}

#[derive(Clone, Default)]
struct FakeJira {
    total: usize,
    seen_auth: Arc<Mutex<Vec<String>>>,
    comments: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn search(
    State(state): State<FakeJira>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.seen_auth.lock().push(auth.to_string());
    }
    let start: usize = params.get("startAt").and_then(|v| v.parse().ok()).unwrap_or(0);
    let max: usize = params
        .get("maxResults")
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);
    assert_eq!(
        params.get("fields").map(String::as_str),
        Some("summary,description,issuetype")
    );

    let end = (start + max).min(state.total);
    let issues: Vec<Value> = (start..end).map(issue_json).collect();
    Json(json!({"startAt": start, "maxResults": max, "total": state.total, "issues": issues}))
}

async fn comment(
    State(state): State<FakeJira>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    if key == "MISSING-1" {
        return StatusCode::NOT_FOUND;
    }
    state.comments.lock().push((key, body));
    StatusCode::CREATED
}

async fn spawn_fake_jira(state: FakeJira) -> SocketAddr {
    let app = Router::new()
        .route("/rest/api/3/search", get(search))
        .route("/rest/api/3/issue/{key}/comment", post(comment))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[test]
fn test_flatten_rich_text_description() {
    let doc = json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Login"},
                {"type": "text", "text": "fails"}
            ]},
            {"type": "bulletList", "content": [
                {"type": "listItem", "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "on Safari"}]}
                ]}
            ]}
        ]
    });

    assert_eq!(flatten_description(Some(&doc)), "Login fails on Safari");
}

#[test]
fn test_flatten_null_and_plain_descriptions() {
    assert_eq!(flatten_description(None), "");
    assert_eq!(flatten_description(Some(&Value::Null)), "");
    assert_eq!(
        flatten_description(Some(&json!("already plain"))),
        "already plain"
    );
    assert_eq!(flatten_description(Some(&json!({"type": "doc"}))), "");
}

#[test]
fn test_textual_representation_format() {
    let issue = TrackerIssue {
        issue_id: 1,
        key: "PTP-1".to_string(),
        summary: "Connect GitHub".to_string(),
        description: "Link PRs to issues".to_string(),
        issue_type: "Story".to_string(),
        url: "https://example.atlassian.net/browse/PTP-1".to_string(),
    };

    assert_eq!(
        issue.textual_representation(),
        "KEY: PTP-1 \n SUMMARY: Connect GitHub \n DESCRIPTION: Link PRs to issues"
    );
}

#[test]
fn test_normalize_base_url() {
    assert_eq!(
        normalize_base_url("https://x.atlassian.net/"),
        "https://x.atlassian.net"
    );
    assert_eq!(
        normalize_base_url("https://x.atlassian.net/rest/api/3"),
        "https://x.atlassian.net"
    );
    assert_eq!(
        normalize_base_url(" https://x.atlassian.net/rest/api/3/ "),
        "https://x.atlassian.net"
    );
}

#[test]
fn test_credentials_urls() {
    let creds = TrackerCredentials::basic("https://x.atlassian.net/rest/api/3", "a@b.c", "t");
    assert_eq!(creds.browse_url("PTP-7"), "https://x.atlassian.net/browse/PTP-7");
    assert_eq!(
        creds.api_url("/search"),
        "https://x.atlassian.net/rest/api/3/search"
    );
}

#[test]
fn test_auth_debug_redacts_secrets() {
    let creds = TrackerCredentials::basic("https://x", "me@example.com", "s3cret");
    let rendered = format!("{:?}", creds);
    assert!(rendered.contains("me@example.com"));
    assert!(!rendered.contains("s3cret"));

    let header = TrackerAuth::Header("Bearer abc".to_string());
    assert!(!format!("{:?}", header).contains("abc"));
}

#[test]
fn test_comment_document_shape() {
    let doc = comment_document("hello");
    assert_eq!(doc["body"]["type"], "doc");
    assert_eq!(doc["body"]["content"][0]["content"][0]["text"], "hello");
}

#[tokio::test]
async fn test_fetch_all_paginates() {
    let state = FakeJira {
        total: 7,
        ..Default::default()
    };
    let addr = spawn_fake_jira(state.clone()).await;
    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");

    let client = JiraClient::default().with_page_size(3);
    let issues = client.fetch_all(&creds).await.unwrap();

    assert_eq!(issues.len(), 7);
    assert_eq!(issues[0].key, "PTP-0");
    assert_eq!(issues[0].issue_id, 10000);
    assert_eq!(issues[6].key, "PTP-6");
    assert_eq!(issues[2].description, "Body 2");
    assert_eq!(issues[2].issue_type, "Task");
    assert_eq!(issues[2].url, format!("http://{}/browse/PTP-2", addr));

    let seen = state.seen_auth.lock().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|a| a.starts_with("Basic ")));
}

#[tokio::test]
async fn test_fetch_all_empty_tracker() {
    let addr = spawn_fake_jira(FakeJira::default()).await;
    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");

    let issues = JiraClient::default().fetch_all(&creds).await.unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_header_auth_is_forwarded() {
    let state = FakeJira {
        total: 1,
        ..Default::default()
    };
    let addr = spawn_fake_jira(state.clone()).await;
    let creds = TrackerCredentials::new(
        &format!("http://{}", addr),
        TrackerAuth::Header("Bearer passthrough".to_string()),
    );

    JiraClient::default().fetch_all(&creds).await.unwrap();
    assert_eq!(state.seen_auth.lock().clone(), vec!["Bearer passthrough"]);
}

#[tokio::test]
async fn test_http_error_is_status_error() {
    let app = Router::new().route(
        "/rest/api/3/search",
        get(|| async { (StatusCode::UNAUTHORIZED, "bad token") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");
    let result = JiraClient::default().fetch_all(&creds).await;

    match result {
        Err(TrackerError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let app = Router::new().route("/rest/api/3/search", get(|| async { "not json" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");
    let result = JiraClient::default().fetch_all(&creds).await;
    assert!(matches!(result, Err(TrackerError::Malformed { .. })));
}

#[tokio::test]
async fn test_unreachable_tracker_is_transport_error() {
    let creds = TrackerCredentials::basic("http://127.0.0.1:1", "me@example.com", "tok");
    let result = JiraClient::default().fetch_all(&creds).await;
    assert!(matches!(result, Err(TrackerError::Transport(_))));
}

#[tokio::test]
async fn test_add_comment_posts_document() {
    let state = FakeJira::default();
    let addr = spawn_fake_jira(state.clone()).await;
    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");

    JiraClient::default()
        .add_comment(&creds, "PTP-3", "Touched by PR #12")
        .await
        .unwrap();

    let comments = state.comments.lock().clone();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].0, "PTP-3");
    assert_eq!(
        comments[0].1["body"]["content"][0]["content"][0]["text"],
        "Touched by PR #12"
    );
}

#[tokio::test]
async fn test_add_comment_failure_status() {
    let addr = spawn_fake_jira(FakeJira::default()).await;
    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");

    let result = JiraClient::default()
        .add_comment(&creds, "MISSING-1", "hello")
        .await;
    assert!(matches!(result, Err(TrackerError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_static_source_records_comments() {
    let source = StaticCandidateSource::new(vec![]);
    let creds = TrackerCredentials::basic("https://x", "a", "b");

    assert!(source.fetch_all(&creds).await.unwrap().is_empty());
    source.add_comment(&creds, "PTP-1", "hi").await.unwrap();
    assert_eq!(source.comments(), vec![("PTP-1".to_string(), "hi".to_string())]);

    let failing = StaticCandidateSource::failing(503);
    assert!(matches!(
        failing.fetch_all(&creds).await,
        Err(TrackerError::Status { status: 503, .. })
    ));
}

#[test]
fn test_issue_key_shape() {
    for key in ["PTP-1", "A-1", "AB_2C-1042"] {
        assert!(is_valid_issue_key(key), "{} should be accepted", key);
    }
    for key in [
        "",
        "PTP",
        "PTP-",
        "ptp-1",
        "1PTP-1",
        "PTP-1a",
        "PTP-1/comment",
        "../../../../rest/api/3/user?x=",
        "PTP-1?expand=all",
    ] {
        assert!(!is_valid_issue_key(key), "{:?} should be rejected", key);
    }
}

#[test]
fn test_issue_api_url_encodes_key_as_one_segment() {
    let creds = TrackerCredentials::basic("https://acme.atlassian.net", "a@b.c", "t");

    let url = creds.issue_api_url("PTP-7", "comment").unwrap();
    assert_eq!(
        url.as_str(),
        "https://acme.atlassian.net/rest/api/3/issue/PTP-7/comment"
    );

    let url = creds
        .issue_api_url("../../../../rest/api/3/user?x=", "comment")
        .unwrap();
    assert!(url.path().starts_with("/rest/api/3/issue/"));
    assert!(url.path().ends_with("/comment"));
    assert_eq!(url.query(), None);
    assert_eq!(url.path_segments().map(|s| s.count()), Some(6));
}

#[tokio::test]
async fn test_add_comment_rejects_traversal_key() {
    let state = FakeJira::default();
    let addr = spawn_fake_jira(state.clone()).await;
    let creds = TrackerCredentials::basic(&format!("http://{}", addr), "me@example.com", "tok");

    let result = JiraClient::default()
        .add_comment(&creds, "../../../../rest/api/3/user?x=", "hello")
        .await;

    assert!(matches!(result, Err(TrackerError::InvalidIssueKey { .. })));
    assert!(state.comments.lock().is_empty());
}
