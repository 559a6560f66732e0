mod common;

use common::{key_pair, MockResponse, MockServer, RecordedRequest};
use ed25519_dalek::Signature;
use lotusx_backpack::core::kernel::{build_message, PublicKeyHandle, RetryMode, RetryPolicy};
use lotusx_backpack::exchanges::backpack::{OrderRef, OrderRequest, Side, TimeInForce};
use lotusx_backpack::{build_client, BackpackClient, ExchangeConfig, ExchangeError, Params, TransportError};
use base64::engine::general_purpose;
use base64::Engine;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;

const SEED: [u8; 32] = [7u8; 32];

fn signed_config(server: &MockServer) -> ExchangeConfig {
    let (private, public) = key_pair(SEED);
    ExchangeConfig::new(public, private)
        .base_url(server.base_url.clone())
        .retry(RetryPolicy::none())
}

fn read_only_config(server: &MockServer) -> ExchangeConfig {
    ExchangeConfig::read_only()
        .base_url(server.base_url.clone())
        .retry(RetryPolicy::none())
}

/// Check the auth headers on `request` against a locally rebuilt message
fn assert_signed(request: &RecordedRequest, instruction: &str, params: &Params) {
    let (_, public) = key_pair(SEED);
    assert_eq!(request.header("X-API-Key"), Some(public.as_str()));
    assert_eq!(request.header("X-Window"), Some("5000"));

    let timestamp: i64 = request.header("X-Timestamp").unwrap().parse().unwrap();
    let signature_bytes = general_purpose::STANDARD
        .decode(request.header("X-Signature").unwrap())
        .unwrap();
    let signature = Signature::from_slice(&signature_bytes).unwrap();

    let message = build_message(instruction, params, timestamp, 5000).unwrap();
    let key = PublicKeyHandle::from_base64(&public).unwrap();
    assert!(key.verify(&message, &signature), "signature did not verify");
}

#[tokio::test]
async fn test_public_get_sends_query_without_auth() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"asks":[["21.5","3"]],"bids":[["21.4","1.2"]],"lastUpdateId":"123","timestamp":1700000000000}"#,
    )])
    .await;
    let client = build_client(read_only_config(&server)).unwrap();

    let depth = client.depth("SOL_USDC").await.unwrap();
    assert_eq!(depth.asks[0].0, Decimal::from_str("21.5").unwrap());
    assert_eq!(depth.bids[0].1, Decimal::from_str("1.2").unwrap());
    assert_eq!(depth.last_update_id, "123");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/api/v1/depth?symbol=SOL_USDC");
    assert!(requests[0].header("X-Signature").is_none());
    assert!(requests[0]
        .header("User-Agent")
        .unwrap()
        .starts_with("LotusX-Backpack/"));
}

#[tokio::test]
async fn test_plain_text_endpoints() {
    let server = MockServer::start(vec![
        MockResponse::text("pong"),
        MockResponse::text("1700000000123"),
    ])
    .await;
    let client = build_client(read_only_config(&server)).unwrap();

    assert_eq!(client.ping().await.unwrap(), "pong");
    assert_eq!(client.time().await.unwrap(), 1_700_000_000_123);
}

#[tokio::test]
async fn test_private_get_is_signed() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"SOL":{"available":"12.5","locked":"0","staked":"0"},"USDC":{"available":"100","locked":"2.25","staked":"0"}}"#,
    )])
    .await;
    let client = build_client(signed_config(&server)).unwrap();

    let balances = client.balances().await.unwrap();
    assert_eq!(balances["SOL"].available, Decimal::from_str("12.5").unwrap());
    assert_eq!(balances["USDC"].locked, Decimal::from_str("2.25").unwrap());

    let requests = server.requests();
    assert_eq!(requests[0].target, "/api/v1/capital");
    assert_signed(&requests[0], "balanceQuery", &Params::new());
}

#[tokio::test]
async fn test_order_execute_posts_signed_json_body() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"id":"111","clientId":7,"symbol":"SOL_USDC","side":"Bid","orderType":"Limit","status":"New","quantity":"1.5","price":"20.5","timeInForce":"GTC"}"#,
    )])
    .await;
    let client = build_client(signed_config(&server)).unwrap();

    let order = OrderRequest::limit(
        "SOL_USDC",
        Side::Bid,
        Decimal::from_str("1.5").unwrap(),
        Decimal::from_str("20.5").unwrap(),
    )
    .time_in_force(TimeInForce::Gtc)
    .client_id(7);

    let placed = client.execute_order(&order).await.unwrap();
    assert_eq!(placed.id, "111");
    assert_eq!(placed.client_id, Some(7));
    assert_eq!(placed.side, Side::Bid);

    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/v1/order");
    assert_eq!(
        request.header("Content-Type"),
        Some("application/json; charset=utf-8")
    );

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["symbol"], json!("SOL_USDC"));
    assert_eq!(body["side"], json!("Bid"));
    assert_eq!(body["orderType"], json!("Limit"));
    assert_eq!(body["price"], json!("20.5"));
    assert_eq!(body["clientId"], json!(7));

    assert_signed(request, "orderExecute", &order.to_params());
}

#[tokio::test]
async fn test_order_cancel_uses_delete() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"id":"111","symbol":"SOL_USDC","side":"Ask","orderType":"Limit","status":"Cancelled"}"#,
    )])
    .await;
    let client = build_client(signed_config(&server)).unwrap();

    let cancelled = client
        .cancel_order("SOL_USDC", &OrderRef::OrderId("111".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, "Cancelled");

    let request = &server.requests()[0];
    assert_eq!(request.method, "DELETE");
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!({"orderId": "111", "symbol": "SOL_USDC"}));

    let params = Params::new().with("symbol", "SOL_USDC").with("orderId", "111");
    assert_signed(request, "orderCancel", &params);
}

#[tokio::test]
async fn test_exchange_error_is_extracted_and_not_retried_in_transient_mode() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"error":["EOrderNotFound","Xunrelated"]}"#,
    )])
    .await;
    let config =
        signed_config(&server).retry(RetryPolicy::default().with_mode(RetryMode::Transient));
    let client = build_client(config).unwrap();

    let err = client
        .order("SOL_USDC", &OrderRef::ClientId(42))
        .await
        .unwrap_err();

    match err {
        ExchangeError::ExchangeApi {
            codes,
            method,
            request_body,
        } => {
            assert_eq!(codes, vec!["OrderNotFound".to_string()]);
            assert_eq!(method, "orderQuery");
            let body: Value = serde_json::from_str(&request_body).unwrap();
            assert_eq!(body, json!({"clientId": 42, "symbol": "SOL_USDC"}));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_client_error_status_is_not_retried_in_transient_mode() {
    let server = MockServer::start(vec![MockResponse::status(
        400,
        r#"{"code":"INVALID_CLIENT_REQUEST","message":"bad symbol"}"#,
    )])
    .await;
    let config = read_only_config(&server).retry(
        RetryPolicy::default()
            .with_base_delay(Duration::from_millis(5))
            .with_mode(RetryMode::Transient),
    );
    let client = build_client(config).unwrap();

    let err = client.ticker("NOPE").await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Transport(TransportError::Status { status: 400, ref body }) if body.contains("bad symbol")
    ));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried_with_fresh_signature() {
    let server = MockServer::start(vec![
        MockResponse::status(503, "unavailable"),
        MockResponse::json(r#"{"SOL":{"available":"1","locked":"0","staked":"0"}}"#),
    ])
    .await;
    let config = signed_config(&server)
        .retry(RetryPolicy::default().with_base_delay(Duration::from_millis(5)));
    let client = build_client(config).unwrap();

    let balances = client.balances().await.unwrap();
    assert_eq!(balances["SOL"].available, Decimal::ONE);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_signed(request, "balanceQuery", &Params::new());
    }

    let timestamp = |r: &RecordedRequest| -> i64 { r.header("X-Timestamp").unwrap().parse().unwrap() };
    assert!(timestamp(&requests[1]) > timestamp(&requests[0]));
    assert_ne!(
        requests[0].header("X-Signature"),
        requests[1].header("X-Signature")
    );
}

#[tokio::test]
async fn test_default_policy_retries_client_errors() {
    let server = MockServer::start(vec![MockResponse::status(400, "bad request")]).await;
    let config = read_only_config(&server)
        .retry(RetryPolicy::default().with_base_delay(Duration::from_millis(1)));
    let client = build_client(config).unwrap();

    let err = client.status().await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Transport(TransportError::Status { status: 400, .. })
    ));
    assert_eq!(server.requests().len(), 11);
}

#[tokio::test]
async fn test_malformed_base_url_fails_once_in_transient_mode() {
    let config = ExchangeConfig::read_only()
        .base_url("http://[not-a-host".to_string())
        .retry(RetryPolicy::default().with_mode(RetryMode::Transient));
    let client = build_client(config).unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), client.ping())
        .await
        .expect("malformed URL must not be retried")
        .unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Transport(TransportError::Request(_))
    ));
}

#[tokio::test]
async fn test_default_mode_retries_exchange_errors() {
    let server = MockServer::start(vec![MockResponse::json(
        r#"{"error":["EService:Unavailable"]}"#,
    )])
    .await;
    let config = read_only_config(&server).retry(
        RetryPolicy::default()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(1)),
    );
    let client = build_client(config).unwrap();

    let err = client.status().await.unwrap_err();
    assert!(matches!(err, ExchangeError::ExchangeApi { ref codes, .. } if codes == &vec!["Service:Unavailable".to_string()]));
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_mismatched_key_pair_never_reaches_network() {
    let server = MockServer::start(vec![MockResponse::text("pong")]).await;
    let (private, _) = key_pair(SEED);
    let (_, other_public) = key_pair([8u8; 32]);

    let config = ExchangeConfig::new(other_public, private).base_url(server.base_url.clone());
    let err = build_client(config).unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidKeyPair(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_read_only_client_rejects_private_call_locally() {
    let server = MockServer::start(vec![MockResponse::json("{}")]).await;
    let client: BackpackClient = build_client(read_only_config(&server)).unwrap();

    let err = client.open_orders(None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::AuthError(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ExchangeConfig::read_only()
        .base_url(format!("http://{}", addr))
        .retry(RetryPolicy::none());
    let client = build_client(config).unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, ExchangeError::Transport(_)));
}
