//! Wire-level gateway tests against a mock data store
//!
//! These exercise the full invocation path: validation, the single store
//! call, and the response mapping, with the store stubbed by httpmock.

use foodshare_gateway::{Gateway, Invocation};
use foodshare_store_client::ServiceConfig;
use httpmock::prelude::*;
use serde_json::json;

fn gateway_for(server: &MockServer) -> Gateway {
    let config = ServiceConfig::with_parts(server.base_url(), "test-service-key");
    Gateway::with_config(config).unwrap()
}

#[tokio::test]
async fn get_returns_record_from_store() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/posts")
            .query_param("id", "eq.42")
            .header("apikey", "test-service-key");
        then.status(200)
            .json_body(json!([{"id": 42, "title": "Fresh Bread"}]));
    });

    let gateway = gateway_for(&server);
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "get",
            "payload": {"table": "posts", "id": "42"}
        })))
        .await;

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["title"], "Fresh Bread");
}

#[tokio::test]
async fn get_maps_absent_record_to_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/posts");
        then.status(200).json_body(json!([]));
    });

    let gateway = gateway_for(&server);
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "get",
            "payload": {"table": "posts", "id": "nope"}
        })))
        .await;

    assert_eq!(response.status, 404);
    assert_eq!(response.body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn insert_returns_created_record() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/posts")
            .header("prefer", "return=representation")
            .json_body(json!({"title": "Soup", "postType": "food"}));
        then.status(201)
            .json_body(json!([{"id": 7, "title": "Soup", "postType": "food"}]));
    });

    let gateway = gateway_for(&server);
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "insert",
            "payload": {
                "table": "posts",
                "record": {"title": "Soup", "postType": "food"}
            }
        })))
        .await;

    mock.assert();
    assert_eq!(response.status, 201);
    assert_eq!(response.body["data"]["id"], 7);
}

#[tokio::test]
async fn malformed_invocation_never_contacts_store() {
    let server = MockServer::start();
    // no matchers: the mock counts every request that reaches the store
    let catch_all = server.mock(|_when, then| {
        then.status(200).json_body(json!([]));
    });

    let gateway = gateway_for(&server);

    // missing op
    let response = gateway.handle(Invocation::post(json!({}))).await;
    assert_eq!(response.status, 400);

    // missing payload field
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "get",
            "payload": {"table": "posts"}
        })))
        .await;
    assert_eq!(response.status, 400);

    // hostile table name
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "insert",
            "payload": {"table": "a b c", "record": {}}
        })))
        .await;
    assert_eq!(response.status, 400);

    catch_all.assert_hits(0);
}

#[tokio::test]
async fn store_failure_maps_to_internal_error_without_retry() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/posts");
        then.status(503).body("service unavailable");
    });

    let gateway = gateway_for(&server);
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "get",
            "payload": {"table": "posts", "id": "1"}
        })))
        .await;

    // exactly one request reached the store
    mock.assert_hits(1);
    assert_eq!(response.status, 500);
    assert_eq!(response.body["error"]["code"], "DEPENDENCY_ERROR");
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn auth_rejection_maps_to_bad_gateway() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/posts");
        then.status(401).body("invalid apikey");
    });

    let gateway = gateway_for(&server);
    let response = gateway
        .handle(Invocation::post(json!({
            "op": "get",
            "payload": {"table": "posts", "id": "1"}
        })))
        .await;

    assert_eq!(response.status, 502);
    assert_eq!(response.body["error"]["code"], "DEPENDENCY_ERROR");
}

#[tokio::test]
async fn repeated_read_yields_same_response_shape() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/posts");
        then.status(200).json_body(json!([{"id": 1, "title": "Bread"}]));
    });

    let gateway = gateway_for(&server);
    let invocation = json!({
        "op": "get",
        "payload": {"table": "posts", "id": "1"}
    });

    let first = gateway.handle(Invocation::post(invocation.clone())).await;
    let second = gateway.handle(Invocation::post(invocation)).await;

    assert_eq!(first.status, second.status);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn ping_matches_documented_contract() {
    let server = MockServer::start();
    let gateway = gateway_for(&server);

    let response = gateway.handle(Invocation::post(json!({"op": "ping"}))).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["ok"], true);
}
