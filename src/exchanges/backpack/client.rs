use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    normalize, retry, Ed25519Signer, Envelope, OperationDescriptor, OperationRegistry, ReqwestRest,
    RestClient, RestClientConfig, RetryPolicy, Signer,
};
use crate::core::types::Params;
use crate::exchanges::backpack::endpoints;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

/// Backpack REST client.
///
/// Every call goes through the same pipeline: look up the operation, sign it
/// if it is private, send it, normalize the response. Signing happens inside
/// the retry loop so each attempt carries its own timestamp.
///
/// Cloning is cheap; clones share the registry and key material.
#[derive(Clone)]
pub struct BackpackClient<R: RestClient = ReqwestRest> {
    rest: R,
    registry: Arc<OperationRegistry>,
    signer: Option<Arc<dyn Signer>>,
    window_ms: u64,
    retry: RetryPolicy,
}

impl<R: RestClient> std::fmt::Debug for BackpackClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackpackClient")
            .field("operations", &self.registry.len())
            .field("has_signer", &self.signer.is_some())
            .field("window_ms", &self.window_ms)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Validate credentials from `config`.
///
/// Returns `None` for a read-only config. Runs before any network access.
pub(crate) fn signer_from_config(
    config: &ExchangeConfig,
) -> Result<Option<Arc<dyn Signer>>, ExchangeError> {
    match (config.api_key().is_empty(), config.secret_key().is_empty()) {
        (true, true) => Ok(None),
        (false, false) => {
            let signer = Ed25519Signer::from_base64(config.secret_key(), config.api_key())?;
            Ok(Some(Arc::new(signer)))
        }
        _ => Err(ExchangeError::AuthError(
            "Both api_key and secret_key are required for authenticated access".to_string(),
        )),
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl BackpackClient<ReqwestRest> {
    /// Create a client over reqwest.
    ///
    /// Fails with [`ExchangeError::InvalidKeyPair`] if the configured public
    /// key does not belong to the configured private key.
    pub fn new(config: ExchangeConfig) -> Result<Self, ExchangeError> {
        let rest = ReqwestRest::new(
            RestClientConfig::new("backpack".to_string()).with_timeout(config.timeout_seconds),
        )?;
        Self::with_rest(rest, &config)
    }
}

impl<R: RestClient> BackpackClient<R> {
    /// Create a client over any transport, using the Backpack operation table
    pub fn with_rest(rest: R, config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let registry = endpoints::registry(config.resolved_base_url());
        Ok(Self::from_parts(
            rest,
            registry,
            signer_from_config(config)?,
            config,
        ))
    }

    pub(crate) fn from_parts(
        rest: R,
        registry: OperationRegistry,
        signer: Option<Arc<dyn Signer>>,
        config: &ExchangeConfig,
    ) -> Self {
        Self {
            rest,
            registry: Arc::new(registry),
            signer,
            window_ms: config.window_ms,
            retry: config.retry.clone(),
        }
    }

    pub fn can_authenticate(&self) -> bool {
        self.signer.is_some()
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Call an operation by name.
    ///
    /// Fails with [`ExchangeError::InvalidOperation`] for unknown names and
    /// with [`ExchangeError::AuthError`] for private operations on a
    /// read-only client, both before any request is sent.
    #[instrument(skip(self, params), fields(exchange = "backpack", instruction = %name, param_count = params.len()))]
    pub async fn call(&self, name: &str, params: &Params) -> Result<Envelope, ExchangeError> {
        let descriptor = self
            .registry
            .lookup(name)
            .ok_or_else(|| ExchangeError::InvalidOperation(name.to_string()))?;

        let signer = if descriptor.auth_required {
            let signer = self.signer.as_deref().ok_or_else(|| {
                ExchangeError::AuthError(format!("{} requires API credentials", name))
            })?;
            Some(signer)
        } else {
            None
        };

        let request_body = serde_json::to_string(params).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize parameters: {}", e))
        })?;

        retry::run(&self.retry, name, |_| {
            self.attempt(descriptor, signer, params, &request_body)
        })
        .await
    }

    /// Call an operation and deserialize its JSON payload
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<T, ExchangeError> {
        self.call(name, params).await?.deserialize()
    }

    async fn attempt(
        &self,
        descriptor: &OperationDescriptor,
        signer: Option<&dyn Signer>,
        params: &Params,
        request_body: &str,
    ) -> Result<Envelope, ExchangeError> {
        let auth = match signer {
            Some(signer) => Some(signer.sign_request(
                &descriptor.name,
                params,
                now_millis(),
                self.window_ms,
            )?),
            None => None,
        };

        let raw = self.rest.send(descriptor, auth.as_ref(), params).await?;
        normalize(raw, &descriptor.name, request_body)
    }
}
