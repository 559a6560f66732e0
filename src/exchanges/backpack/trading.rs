use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Params;
use crate::exchanges::backpack::client::BackpackClient;
use crate::exchanges::backpack::endpoints::instruction;
use crate::exchanges::backpack::types::{BackpackOrder, OrderRef, OrderRequest};
use serde_json::Value;
use tracing::instrument;

/// Order management (all signed)
impl<R: RestClient> BackpackClient<R> {
    #[instrument(skip(self, order), fields(exchange = "backpack", symbol = %order.symbol))]
    pub async fn execute_order(&self, order: &OrderRequest) -> Result<BackpackOrder, ExchangeError> {
        self.call_json(instruction::ORDER_EXECUTE, &order.to_params())
            .await
    }

    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order: &OrderRef,
    ) -> Result<BackpackOrder, ExchangeError> {
        let mut params = Params::new().with("symbol", symbol);
        order.insert_into(&mut params);
        self.call_json(instruction::ORDER_CANCEL, &params).await
    }

    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn cancel_all_orders(&self, symbol: &str) -> Result<Vec<BackpackOrder>, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.call_json(instruction::ORDER_CANCEL_ALL, &params).await
    }

    pub async fn order(&self, symbol: &str, order: &OrderRef) -> Result<BackpackOrder, ExchangeError> {
        let mut params = Params::new().with("symbol", symbol);
        order.insert_into(&mut params);
        self.call_json(instruction::ORDER_QUERY, &params).await
    }

    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<BackpackOrder>, ExchangeError> {
        let params = Params::new().with_opt("symbol", symbol);
        self.call_json(instruction::ORDER_QUERY_ALL, &params).await
    }

    /// Historical orders; entries carry more fields than open orders, so they
    /// are returned untyped
    pub async fn order_history(
        &self,
        symbol: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with_opt("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.call(instruction::ORDER_HISTORY_QUERY_ALL, &params)
            .await?
            .into_json()
    }
}
