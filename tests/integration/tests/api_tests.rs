//! API Integration Tests
//!
//! Every test spawns its own server on the in-memory store; no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, domain_admin, editor, reader, unique_target,
    AdminChangeBody, CommentBody, CreateCommentRequest, CurrentUserBody, ReactionAppliedBody,
    ReactionStateBody, SnapshotBody, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_reports_redis_disabled() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["store"], "healthy");
    assert_eq!(body["checks"]["redis"], "disabled");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .get(&format!("/api/v1/targets/{}/comments", unique_target()))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_current_user_requires_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/api/v1/users/@me", "not-a-token").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_current_user_reports_admin_status() {
    let server = TestServer::start().await.unwrap();

    let user = reader();
    let token = server.token_for(&user).unwrap();
    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let me: CurrentUserBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.uid, user.uid.as_str());
    assert!(!me.is_admin);

    let token = server.token_for(&domain_admin()).unwrap();
    let response = server.get_auth("/api/v1/users/@me", &token).await.unwrap();
    let me: CurrentUserBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(me.is_admin);
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_thread_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let target = unique_target();
    let path = format!("/api/v1/targets/{target}/comments");

    let author = server.token_for(&reader()).unwrap();
    let other = server.token_for(&reader()).unwrap();

    // Empty for anonymous viewers
    let response = server.get(&path).await.unwrap();
    let snapshot: SnapshotBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(snapshot.threads.is_empty());
    assert_eq!(snapshot.total, 0);

    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::text("First!"))
        .await
        .unwrap();
    let parent: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(parent.text, "First!");
    assert_eq!(parent.age_label, "just now");
    assert!(parent.can_delete);

    let response = server
        .post_auth(&path, &other, &CreateCommentRequest::reply(&parent.id, "Agreed"))
        .await
        .unwrap();
    let reply: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.parent_id.as_deref(), Some(parent.id.as_str()));

    // Replies stay one level deep
    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::reply(&reply.id, "Nested"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "NESTED_REPLY");

    let response = server.get_auth(&path, &other).await.unwrap();
    let snapshot: SnapshotBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.threads.len(), 1);
    assert_eq!(snapshot.total, 2);
    assert_eq!(snapshot.threads[0].replies.len(), 1);
    assert!(!snapshot.threads[0].comment.can_delete);
    assert!(snapshot.threads[0].replies[0].can_delete);
}

#[tokio::test]
async fn test_comment_validation() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/comments", unique_target());
    let token = server.token_for(&reader()).unwrap();

    let response = server
        .post_auth(&path, &token, &CreateCommentRequest::text(""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let long = "x".repeat(2001);
    let response = server
        .post_auth(&path, &token, &CreateCommentRequest::text(&long))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CONTENT_TOO_LONG");

    let response = server
        .post(&path, &CreateCommentRequest::text("anonymous"))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_threads_window_and_expand() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/comments", unique_target());
    let token = server.token_for(&reader()).unwrap();

    for text in ["one", "two", "three"] {
        let response = server
            .post_auth(&path, &token, &CreateCommentRequest::text(text))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get(&path).await.unwrap();
    let snapshot: SnapshotBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.threads.len(), 2);
    assert_eq!(snapshot.hidden, 1);
    assert!(!snapshot.expanded);
    assert_eq!(snapshot.threads[0].comment.text, "three");

    let response = server.get(&format!("{path}?expanded=true")).await.unwrap();
    let snapshot: SnapshotBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(snapshot.threads.len(), 3);
    assert_eq!(snapshot.hidden, 0);
    assert!(snapshot.expanded);

    let response = server.get(&format!("{path}?expanded=maybe")).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_delete_comment_rules() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/comments", unique_target());
    let author = server.token_for(&reader()).unwrap();
    let other = server.token_for(&reader()).unwrap();

    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::text("regrettable"))
        .await
        .unwrap();
    let comment: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let delete_path = format!("/api/v1/comments/{}", comment.id);

    let response = server
        .delete_auth(&format!("{delete_path}?confirm=true"), &other)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_COMMENT_AUTHOR");

    // Unconfirmed
    let response = server.delete_auth(&delete_path, &author).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .delete_auth(&format!("{delete_path}?confirm=true"), &author)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .delete_auth(&format!("{delete_path}?confirm=true"), &author)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_COMMENT");
}

#[tokio::test]
async fn test_admin_deletes_any_comment() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/comments", unique_target());
    let author = server.token_for(&reader()).unwrap();
    let admin = server.token_for(&domain_admin()).unwrap();

    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::text("spam"))
        .await
        .unwrap();
    let comment: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .delete_auth(&format!("/api/v1/comments/{}?confirm=true", comment.id), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_pin_requires_capability() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/comments", unique_target());
    let author = server.token_for(&reader()).unwrap();
    let admin = server.token_for(&domain_admin()).unwrap();

    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::text("pin me"))
        .await
        .unwrap();
    let parent: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .post_auth(&path, &author, &CreateCommentRequest::reply(&parent.id, "not me"))
        .await
        .unwrap();
    let reply: CommentBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let pin_path = format!("/api/v1/comments/{}/pin", parent.id);
    let response = server.put_auth(&pin_path, &author).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.put_auth(&pin_path, &admin).await.unwrap();
    let pinned: CommentBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pinned.pinned);
    assert!(pinned.can_pin);

    let response = server
        .put_auth(&format!("/api/v1/comments/{}/pin", reply.id), &admin)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CANNOT_PIN_REPLY");

    let response = server.delete_auth(&pin_path, &admin).await.unwrap();
    let unpinned: CommentBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!unpinned.pinned);
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() {
    let server = TestServer::start().await.unwrap();
    let token = server.token_for(&reader()).unwrap();

    let response = server
        .delete_auth("/api/v1/comments/not-a-uuid?confirm=true", &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_moderation_feed() {
    let server = TestServer::start().await.unwrap();
    let author = server.token_for(&reader()).unwrap();
    let admin = server.token_for(&domain_admin()).unwrap();

    for _ in 0..2 {
        let path = format!("/api/v1/targets/{}/comments", unique_target());
        let response = server
            .post_auth(&path, &author, &CreateCommentRequest::text("hello"))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get_auth("/api/v1/moderation/comments", &author).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth("/api/v1/moderation/comments?limit=1", &admin)
        .await
        .unwrap();
    let feed: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(feed["total"], 2);
    assert_eq!(feed["comments"].as_array().map(Vec::len), Some(1));

    let response = server
        .get_auth("/api/v1/moderation/comments?limit=0", &admin)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_requires_identity() {
    let server = TestServer::start().await.unwrap();
    let path = format!("/api/v1/targets/{}/reactions/like", unique_target());

    let response = server.put(&path).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn test_reaction_toggle_and_switch() {
    let server = TestServer::start().await.unwrap();
    let target = unique_target();
    let token = server.token_for(&reader()).unwrap();
    let base = format!("/api/v1/targets/{target}/reactions");

    let response = server.put_auth(&format!("{base}/like"), &token).await.unwrap();
    let applied: ReactionAppliedBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(applied.applied);
    assert_eq!(applied.state.counts.like, 1);
    assert_eq!(applied.state.viewer_choice.as_deref(), Some("like"));

    // Kinds are case-insensitive in the path
    let response = server.put_auth(&format!("{base}/HEART"), &token).await.unwrap();
    let applied: ReactionAppliedBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(applied.state.counts.like, 0);
    assert_eq!(applied.state.counts.heart, 1);
    assert_eq!(applied.state.counts.total, 1);

    let response = server.put_auth(&format!("{base}/heart"), &token).await.unwrap();
    let applied: ReactionAppliedBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(applied.state.counts.total, 0);
    assert!(applied.state.viewer_choice.is_none());

    let response = server.get(&base).await.unwrap();
    let state: ReactionStateBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(state.counts.dislike, 0);
    assert_eq!(state.counts.total, 0);
}

#[tokio::test]
async fn test_unknown_reaction_kind() {
    let server = TestServer::start().await.unwrap();
    let token = server.token_for(&reader()).unwrap();

    let response = server
        .put_auth(&format!("/api/v1/targets/{}/reactions/laugh", unique_target()), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Admin Allow-List Tests
// ============================================================================

#[tokio::test]
async fn test_admin_allow_list() {
    let server = TestServer::start().await.unwrap();
    let admin = server.token_for(&domain_admin()).unwrap();
    let plain = server.token_for(&reader()).unwrap();

    let response = server.get_auth("/api/v1/admins", &plain).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .put_auth("/api/v1/admins/Editor@Example.com", &admin)
        .await
        .unwrap();
    let change: AdminChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(change.email, "editor@example.com");
    assert!(change.changed);

    let response = server
        .put_auth("/api/v1/admins/editor@example.com", &admin)
        .await
        .unwrap();
    let change: AdminChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!change.changed);

    // The listed editor is now an admin
    let editor_token = server.token_for(&editor("editor@example.com")).unwrap();
    let response = server.get_auth("/api/v1/users/@me", &editor_token).await.unwrap();
    let me: CurrentUserBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(me.is_admin);

    let response = server.get_auth("/api/v1/admins", &admin).await.unwrap();
    let list: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list["admins"], serde_json::json!(["editor@example.com"]));

    let response = server
        .delete_auth("/api/v1/admins/editor@example.com", &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth("/api/v1/admins/editor@example.com", &admin)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_ADMIN");
}

// ============================================================================
// Content Tests
// ============================================================================

#[tokio::test]
async fn test_render_article() {
    let server = TestServer::start().await.unwrap();

    let body = serde_json::json!({
        "content": "Join us: https://discord.gg/abc123\n\n(strong)Bold(/strong) <script>"
    });
    let response = server.post("/api/v1/render", &body).await.unwrap();
    let rendered: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    let html = rendered["html"].as_str().unwrap();
    assert!(html.contains("<strong>Bold</strong>"));
    assert!(!html.contains("<script>"));
    assert_eq!(rendered["invites"][0]["code"], "abc123");
}

#[tokio::test]
async fn test_render_rejects_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/render", &serde_json::json!({ "content": 42 }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_BODY");
}

#[tokio::test]
async fn test_invite_lookup_disabled() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/invites/abc123").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
