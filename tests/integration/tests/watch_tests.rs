//! Watch websocket integration tests
//!
//! Run with: cargo test -p integration-tests --test watch_tests

use integration_tests::{
    assert_status, next_json, reader, send_json, unique_target, CreateCommentRequest, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_comments_watch_receives_updates() {
    let server = TestServer::start().await.unwrap();
    let target = unique_target();
    let author = reader();
    let token = server.token_for(&author).unwrap();
    let mut socket = server.watch().await.unwrap();

    send_json(
        &mut socket,
        &json!({"op": "watch", "container": "c-1", "topic": "comments", "target": target}),
    )
    .await
    .unwrap();

    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["type"], "snapshot");
    assert_eq!(frame["container_id"], "c-1");
    assert_eq!(frame["snapshot"]["topic"], "comments");
    assert_eq!(frame["snapshot"]["data"]["threads"], json!([]));

    let response = server
        .post_auth(
            &format!("/api/v1/targets/{target}/comments"),
            &token,
            &CreateCommentRequest::text("live"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["container_id"], "c-1");
    let threads = &frame["snapshot"]["data"]["threads"];
    assert_eq!(threads[0]["comment"]["text"], "live");
    assert_eq!(threads[0]["comment"]["can_delete"], false);

    // Signing in reloads with the viewer's flags
    send_json(&mut socket, &json!({"op": "identify", "token": token}))
        .await
        .unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(
        frame["snapshot"]["data"]["threads"][0]["comment"]["can_delete"],
        true
    );
    assert_eq!(frame["snapshot"]["data"]["viewer"]["authenticated"], true);
}

#[tokio::test]
async fn test_reactions_watch() {
    let server = TestServer::start().await.unwrap();
    let target = unique_target();
    let token = server.token_for(&reader()).unwrap();
    let mut socket = server.watch().await.unwrap();

    send_json(
        &mut socket,
        &json!({"op": "watch", "container": "r-1", "topic": "reactions", "target": target}),
    )
    .await
    .unwrap();

    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["snapshot"]["topic"], "reactions");
    assert_eq!(frame["snapshot"]["data"]["counts"]["total"], 0);

    let response = server
        .put_auth(&format!("/api/v1/targets/{target}/reactions/heart"), &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["container_id"], "r-1");
    assert_eq!(frame["snapshot"]["data"]["counts"]["heart"], 1);
}

#[tokio::test]
async fn test_rejected_commands_get_error_frames() {
    let server = TestServer::start().await.unwrap();
    let mut socket = server.watch().await.unwrap();

    send_json(&mut socket, &json!({"op": "dance"})).await.unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_COMMAND");

    send_json(&mut socket, &json!({"op": "unwatch", "container": "nope"}))
        .await
        .unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["code"], "UNKNOWN_CONTAINER");

    send_json(&mut socket, &json!({"op": "identify", "token": "forged"}))
        .await
        .unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expand_reloads_comments() {
    let server = TestServer::start().await.unwrap();
    let target = unique_target();
    let token = server.token_for(&reader()).unwrap();

    for text in ["one", "two", "three"] {
        let response = server
            .post_auth(
                &format!("/api/v1/targets/{target}/comments"),
                &token,
                &CreateCommentRequest::text(text),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let mut socket = server.watch().await.unwrap();
    send_json(
        &mut socket,
        &json!({"op": "watch", "container": "c-1", "topic": "comments", "target": target}),
    )
    .await
    .unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["snapshot"]["data"]["hidden"], 1);

    send_json(
        &mut socket,
        &json!({"op": "expand", "container": "c-1", "expanded": true}),
    )
    .await
    .unwrap();
    let frame = next_json(&mut socket).await.unwrap();
    assert_eq!(frame["snapshot"]["data"]["expanded"], true);
    assert_eq!(frame["snapshot"]["data"]["hidden"], 0);
}
