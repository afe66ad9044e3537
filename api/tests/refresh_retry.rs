//! Integration tests for the adapter's bearer-attach and one-shot
//! refresh-and-retry pipeline, against a local mock server.

#![allow(clippy::unwrap_used, clippy::panic)]

use lectern_api::mocks::{MemoryEviction, MemoryVault};
use lectern_api::{ApiClient, ApiConfig, ApiError, CredentialVault, ListQuery, PostsApi};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(
    server: &MockServer,
    vault: MemoryVault,
    eviction: MemoryEviction,
) -> Arc<ApiClient<MemoryVault, MemoryEviction>> {
    Arc::new(ApiClient::new(
        ApiConfig::new(server.uri()),
        vault,
        eviction,
    ))
}

#[tokio::test]
async fn attaches_bearer_token_from_vault() {
    let server = MockServer::start().await;
    let vault = MemoryVault::new();
    vault.set_access_token("tok-1");

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(&server, vault, MemoryEviction::new()));
    let page = posts.list(&ListQuery::default()).await.unwrap();
    assert!(page.posts.is_empty());
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh_and_replay() {
    let server = MockServer::start().await;
    let vault = MemoryVault::with_tokens("stale", "rt-1");
    let eviction = MemoryEviction::new();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "rt-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "refreshToken": "rt-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(&server, vault.clone(), eviction.clone()));
    let page = posts.list(&ListQuery::default()).await.unwrap();

    assert!(page.posts.is_empty());
    assert_eq!(vault.access_token().as_deref(), Some("fresh"));
    assert_eq!(vault.refresh_token().as_deref(), Some("rt-2"));
    assert_eq!(eviction.count(), 0);
}

#[tokio::test]
async fn second_unauthorized_after_replay_surfaces_to_caller() {
    let server = MockServer::start().await;
    let vault = MemoryVault::with_tokens("stale", "rt-1");
    let eviction = MemoryEviction::new();

    // Both the original and the replayed request come back 401.
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(&server, vault, eviction));
    let err = posts.list(&ListQuery::default()).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn missing_refresh_token_evicts_and_surfaces_original_error() {
    let server = MockServer::start().await;
    let vault = MemoryVault::new();
    vault.set_access_token("stale");
    let eviction = MemoryEviction::new();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(&server, vault.clone(), eviction.clone()));
    let err = posts.list(&ListQuery::default()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(vault.is_empty());
    assert_eq!(eviction.count(), 1);
}

#[tokio::test]
async fn failed_refresh_evicts_and_surfaces_original_error() {
    let server = MockServer::start().await;
    let vault = MemoryVault::with_tokens("stale", "rt-dead");
    let eviction = MemoryEviction::new();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "revoked"})))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(&server, vault.clone(), eviction.clone()));
    let err = posts.list(&ListQuery::default()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(vault.is_empty());
    assert_eq!(eviction.count(), 1);
}

#[tokio::test]
async fn validation_error_body_is_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "errors": ["title is required"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = PostsApi::new(client_for(
        &server,
        MemoryVault::new(),
        MemoryEviction::new(),
    ));
    let err = posts
        .create(&lectern_api::NewPost {
            title: String::new(),
            content: "body".into(),
            author_id: "u1".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    match err {
        ApiError::Http { errors, .. } => assert_eq!(errors, vec!["title is required"]),
        other => panic!("expected Http error, got {other:?}"),
    }
}
