use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    kernel::{OperationRegistry, ReqwestRest, RestClientConfig},
};
use crate::exchanges::backpack::{client::signer_from_config, endpoints, BackpackClient};

/// Builder for a reqwest-backed [`BackpackClient`]
pub struct BackpackBuilder {
    config: ExchangeConfig,
    registry: Option<OperationRegistry>,
    user_agent: Option<String>,
}

impl BackpackBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            registry: None,
            user_agent: None,
        }
    }

    /// Replace the built-in operation table
    #[must_use]
    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate credentials and build the client.
    ///
    /// Key validation happens here, before the HTTP client exists.
    pub fn build(self) -> Result<BackpackClient<ReqwestRest>, ExchangeError> {
        let signer = signer_from_config(&self.config)?;

        let mut rest_config =
            RestClientConfig::new("backpack".to_string()).with_timeout(self.config.timeout_seconds);
        if let Some(user_agent) = self.user_agent {
            rest_config = rest_config.with_user_agent(user_agent);
        }
        let rest = ReqwestRest::new(rest_config)?;

        let registry = self
            .registry
            .unwrap_or_else(|| endpoints::registry(self.config.resolved_base_url()));

        Ok(BackpackClient::from_parts(rest, registry, signer, &self.config))
    }
}

/// Create a Backpack client with default settings
pub fn build_client(config: ExchangeConfig) -> Result<BackpackClient<ReqwestRest>, ExchangeError> {
    BackpackBuilder::new(config).build()
}
