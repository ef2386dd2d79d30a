use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::BridgeError;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::state::ApiState;
use crate::services::execution_service::ExecutionService;
use crate::test_support::{
    MockExchange, PASSWORD, account, btc_filters, forbid_all_calls, test_config, webhook_body,
};

fn app(mock: MockExchange) -> axum::Router {
    let execution = ExecutionService::new(Arc::new(mock), &test_config());
    super::router(Arc::new(ApiState { execution }))
}

fn post_webhook(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Mock that gets through sizing for BTCUSDT with nothing to reconfigure.
fn ready_exchange() -> MockExchange {
    let mut mock = MockExchange::new();
    mock.expect_server_time().returning(|| Ok(1_700_000_000_000));
    mock.expect_symbol_filters().returning(|_| Ok(btc_filters()));
    mock.expect_account().returning(|_| Ok(account(0, false, 10)));
    mock.expect_cancel_open_orders().returning(|_, _| Ok(()));
    mock
}

#[tokio::test]
async fn test_heartbeat() {
    let mut mock = MockExchange::new();
    forbid_all_calls(&mut mock);

    let req = Request::builder()
        .uri("/heartBeat")
        .body(Body::empty())
        .unwrap();
    let resp = app(mock).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"Alive");
}

#[tokio::test]
async fn test_webhook_places_batch() {
    let mut mock = ready_exchange();
    mock.expect_place_batch_orders()
        .times(1)
        .returning(|_, _| Ok(json!([{"orderId": 11}, {"orderId": 12}, {"orderId": 13}])));

    let resp = app(mock)
        .oneshot(post_webhook(webhook_body("BUY", PASSWORD)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json[2]["orderId"], 13);
}

#[tokio::test]
async fn test_webhook_bad_password() {
    let mut mock = MockExchange::new();
    forbid_all_calls(&mut mock);

    let resp = app(mock)
        .oneshot(post_webhook(webhook_body("BUY", "guess")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["code"], "auth_error");
    assert_eq!(json["message"], "Authentication failed: Nice try");
}

#[tokio::test]
async fn test_webhook_malformed_body() {
    let mut mock = MockExchange::new();
    forbid_all_calls(&mut mock);

    let resp = app(mock)
        .oneshot(post_webhook(b"{not json".to_vec()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["code"], "validation_error");
}

#[tokio::test]
async fn test_webhook_close_side() {
    let mut mock = MockExchange::new();
    mock.expect_server_time().returning(|| Ok(1_700_000_000_000));
    mock.expect_account().returning(|_| Ok(account(0, false, 10)));
    mock.expect_cancel_open_orders().times(1).returning(|_, _| Ok(()));
    mock.expect_symbol_filters().never();
    mock.expect_place_batch_orders().never();

    let resp = app(mock)
        .oneshot(post_webhook(webhook_body("close", PASSWORD)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["code"], "invalid_side");
}

#[tokio::test]
async fn test_webhook_slots_exhausted() {
    let mut mock = MockExchange::new();
    mock.expect_server_time().returning(|| Ok(1_700_000_000_000));
    mock.expect_symbol_filters().returning(|_| Ok(btc_filters()));
    mock.expect_account().returning(|_| Ok(account(5, false, 10)));
    mock.expect_place_batch_orders().never();

    let resp = app(mock)
        .oneshot(post_webhook(webhook_body("SELL", PASSWORD)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["code"], "slots_exhausted");
}

#[tokio::test]
async fn test_webhook_exchange_error_is_verbatim() {
    let exchange_body = r#"{"code":-2019,"msg":"Margin is insufficient."}"#;
    let mut mock = ready_exchange();
    mock.expect_place_batch_orders().returning(move |_, _| {
        Err(BridgeError::Exchange {
            status: 400,
            body: exchange_body.to_string(),
        })
    });

    let resp = app(mock)
        .oneshot(post_webhook(webhook_body("BUY", PASSWORD)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(resp).await, exchange_body.as_bytes());
}
