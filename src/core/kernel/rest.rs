use crate::core::errors::{ExchangeError, TransportError};
use crate::core::kernel::registry::{HttpMethod, OperationDescriptor};
use crate::core::kernel::signer::AuthHeaders;
use crate::core::types::Params;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{instrument, trace};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A successful (2xx) HTTP response, body untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Media type without parameters, lowercased
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// REST transport: one HTTP attempt per call.
///
/// Retrying and signing happen above this layer; implementations only
/// encode, send and classify failures.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Send one request for `descriptor`.
    ///
    /// GET carries `params` in the query string; POST and DELETE carry them
    /// as a JSON body. Non-2xx statuses are returned as
    /// [`TransportError::Status`].
    async fn send(
        &self,
        descriptor: &OperationDescriptor,
        auth: Option<&AuthHeaders>,
        params: &Params,
    ) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Timeout of a single attempt in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            timeout_seconds: 30,
            user_agent: format!("LotusX-Backpack/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn new(config: RestClientConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ExchangeError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, descriptor, auth, params),
        fields(
            exchange = %self.config.exchange_name,
            instruction = %descriptor.name,
            method = %descriptor.method,
            signed = auth.is_some(),
        )
    )]
    async fn send(
        &self,
        descriptor: &OperationDescriptor,
        auth: Option<&AuthHeaders>,
        params: &Params,
    ) -> Result<RawResponse, ExchangeError> {
        let mut request = self
            .client
            .request(descriptor.method.into(), &descriptor.url);

        match descriptor.method {
            HttpMethod::Get => {
                if !params.is_empty() {
                    request = request.query(&params.to_pairs());
                }
            }
            HttpMethod::Post | HttpMethod::Delete => {
                let body = serde_json::to_vec(params).map_err(|e| {
                    ExchangeError::SerializationError(format!(
                        "Failed to serialize request body: {}",
                        e
                    ))
                })?;
                request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
            }
        }

        if let Some(auth) = auth {
            for (key, value) in auth.to_header_pairs() {
                request = request.header(key, value);
            }
        }

        let response = request.send().await.map_err(TransportError::from)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from)?
            .to_vec();

        trace!(status = status.as_u16(), "Response body: {}", String::from_utf8_lossy(&body));

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }
            .into());
        }

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
