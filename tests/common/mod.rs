#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::SigningKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Vec<MockResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Catch-all axum server. Serves `responses` in order, repeating the last
/// one, and records every request it sees.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            responses: Arc::new(responses),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut requests = state.requests.lock().unwrap();
    requests.push(RecordedRequest {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let response = &state.responses[(requests.len() - 1).min(state.responses.len() - 1)];
    (
        StatusCode::from_u16(response.status).unwrap(),
        [(header::CONTENT_TYPE, response.content_type)],
        response.body.clone(),
    )
        .into_response()
}

/// Base64 (private seed, public key) for `seed`
pub fn key_pair(seed: [u8; 32]) -> (String, String) {
    let public = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
    (
        general_purpose::STANDARD.encode(seed),
        general_purpose::STANDARD.encode(public),
    )
}
