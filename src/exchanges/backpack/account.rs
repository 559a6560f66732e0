use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Params;
use crate::exchanges::backpack::client::BackpackClient;
use crate::exchanges::backpack::endpoints::instruction;
use crate::exchanges::backpack::types::{BackpackBalanceMap, BackpackDepositAddress, BackpackFill};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::instrument;

/// Account and capital queries (all signed)
impl<R: RestClient> BackpackClient<R> {
    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn balances(&self) -> Result<BackpackBalanceMap, ExchangeError> {
        self.call_json(instruction::BALANCE_QUERY, &Params::new()).await
    }

    pub async fn deposit_address(
        &self,
        blockchain: &str,
    ) -> Result<BackpackDepositAddress, ExchangeError> {
        let params = Params::new().with("blockchain", blockchain);
        self.call_json(instruction::DEPOSIT_ADDRESS_QUERY, &params)
            .await
    }

    pub async fn deposits(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.call(instruction::DEPOSIT_QUERY_ALL, &params)
            .await?
            .into_json()
    }

    pub async fn withdrawals(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.call(instruction::WITHDRAWAL_QUERY_ALL, &params)
            .await?
            .into_json()
    }

    /// Request a withdrawal. Under the default blind retry policy a rejected
    /// withdrawal is resubmitted; use `RetryMode::Transient` to fail fast.
    #[instrument(skip(self, two_factor_token), fields(exchange = "backpack"))]
    pub async fn withdraw(
        &self,
        address: &str,
        blockchain: &str,
        symbol: &str,
        quantity: Decimal,
        two_factor_token: Option<&str>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("address", address)
            .with("blockchain", blockchain)
            .with("symbol", symbol)
            .with("quantity", quantity)
            .with_opt("twoFactorToken", two_factor_token);
        self.call(instruction::WITHDRAW, &params).await?.into_json()
    }

    pub async fn fill_history(
        &self,
        symbol: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<BackpackFill>, ExchangeError> {
        let params = Params::new()
            .with_opt("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.call_json(instruction::FILL_HISTORY_QUERY_ALL, &params)
            .await
    }
}
