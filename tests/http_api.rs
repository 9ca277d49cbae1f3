//! HTTP API tests driven through the router without binding a socket.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{Harness, DEMO_ADDRESS, DEMO_WALLET, RECIPIENT};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn plan_body(amount: &str) -> Value {
    json!({
        "fromWalletId": DEMO_WALLET,
        "toAddress": RECIPIENT,
        "amount": amount,
        "asset": { "symbol": "ETH", "decimals": 18 },
        "chain": "ethereum",
    })
}

#[tokio::test]
async fn test_plan_execute_status() {
    let h = Harness::new();

    let (status, plan) = send(h.router(), post("/tx/plan", plan_body("0.25"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["status"], "pending");
    assert_eq!(plan["fromAddress"], DEMO_ADDRESS);
    assert_eq!(plan["estimatedGas"], "21000");
    assert_eq!(plan["intent"]["amount"], "0.25");
    let plan_id = plan["planId"].as_str().unwrap().to_string();

    let (status, receipt) = send(h.router(), post("/tx/execute", json!({ "planId": plan_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["planId"], plan_id.as_str());
    assert_eq!(receipt["status"], "confirmed");
    assert_eq!(receipt["chain"], "ethereum");

    let (status, view) = send(h.router(), get(&format!("/tx/{}", plan_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["planStatus"], "completed");
    assert_eq!(view["receipt"]["txHash"], receipt["txHash"]);
}

#[tokio::test]
async fn test_plan_validation_errors() {
    let h = Harness::new();

    let (status, body) = send(h.router(), post("/tx/plan", plan_body("-1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidAmount");

    let mut missing = plan_body("1");
    missing["toAddress"] = json!("");
    let (status, body) = send(h.router(), post("/tx/plan", missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingField");

    let mut unknown_chain = plan_body("1");
    unknown_chain["chain"] = json!("dogechain");
    let (status, body) = send(h.router(), post("/tx/plan", unknown_chain)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingField");

    let mut ghost = plan_body("1");
    ghost["fromWalletId"] = json!("ghost");
    let (status, body) = send(h.router(), post("/tx/plan", ghost)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UnknownWallet");
}

#[tokio::test]
async fn test_execute_errors() {
    let h = Harness::new();

    let (status, body) = send(h.router(), post("/tx/execute", json!({ "planId": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidRequest");

    let missing = uuid::Uuid::new_v4().to_string();
    let (status, body) = send(h.router(), post("/tx/execute", json!({ "planId": missing }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");

    let (_, plan) = send(h.router(), post("/tx/plan", plan_body("1"))).await;
    let plan_id = plan["planId"].clone();
    let (status, _) = send(h.router(), post("/tx/execute", json!({ "planId": plan_id }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(h.router(), post("/tx/execute", json!({ "planId": plan_id }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NotPending");
}

#[tokio::test]
async fn test_broadcast_failure_is_bad_gateway() {
    let h = Harness::new();
    let (_, plan) = send(h.router(), post("/tx/plan", plan_body("1"))).await;

    h.signer.set_fail_broadcast(true);
    let (status, body) = send(
        h.router(),
        post("/tx/execute", json!({ "planId": plan["planId"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "ExecutionFailed");

    let uri = format!("/tx/{}", plan["planId"].as_str().unwrap());
    let (_, view) = send(h.router(), get(&uri)).await;
    assert_eq!(view["planStatus"], "failed");
    assert!(view.get("receipt").is_none());
}

#[tokio::test]
async fn test_status_unknown_and_malformed() {
    let h = Harness::new();

    let uri = format!("/tx/{}", uuid::Uuid::new_v4());
    let (status, _) = send(h.router(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(h.router(), get("/tx/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let h = Harness::new();
    let request = Request::builder()
        .method("POST")
        .uri("/tx/plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(h.router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidBody");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let h = Harness::new();
    let response = h.router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["signer"], "mock");
}
