use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Params;
use crate::exchanges::backpack::client::BackpackClient;
use crate::exchanges::backpack::endpoints::instruction;
use crate::exchanges::backpack::types::{
    BackpackDepth, BackpackKline, BackpackMarket, BackpackStatus, BackpackTicker, BackpackTrade,
};
use serde_json::Value;
use tracing::instrument;

/// Public market data
impl<R: RestClient> BackpackClient<R> {
    pub async fn assets(&self) -> Result<Value, ExchangeError> {
        self.call(instruction::ASSETS, &Params::new()).await?.into_json()
    }

    pub async fn markets(&self) -> Result<Vec<BackpackMarket>, ExchangeError> {
        self.call_json(instruction::MARKETS, &Params::new()).await
    }

    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn ticker(&self, symbol: &str) -> Result<BackpackTicker, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.call_json(instruction::TICKER, &params).await
    }

    pub async fn tickers(&self) -> Result<Vec<BackpackTicker>, ExchangeError> {
        self.call_json(instruction::TICKERS, &Params::new()).await
    }

    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn depth(&self, symbol: &str) -> Result<BackpackDepth, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.call_json(instruction::DEPTH, &params).await
    }

    /// Candles for `symbol`; `interval` uses the exchange's notation ("1m", "1h", "1d", ...)
    #[instrument(skip(self), fields(exchange = "backpack"))]
    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        start_time: i64,
        end_time: Option<i64>,
    ) -> Result<Vec<BackpackKline>, ExchangeError> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval)
            .with("startTime", start_time)
            .with_opt("endTime", end_time);
        self.call_json(instruction::KLINES, &params).await
    }

    pub async fn recent_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<BackpackTrade>, ExchangeError> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.call_json(instruction::RECENT_TRADES, &params).await
    }

    pub async fn historical_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<BackpackTrade>, ExchangeError> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("offset", offset);
        self.call_json(instruction::HISTORICAL_TRADES, &params).await
    }

    pub async fn status(&self) -> Result<BackpackStatus, ExchangeError> {
        self.call_json(instruction::STATUS, &Params::new()).await
    }

    /// Liveness check; the exchange answers "pong" as plain text
    pub async fn ping(&self) -> Result<String, ExchangeError> {
        Ok(self.call(instruction::PING, &Params::new()).await?.into_text())
    }

    /// Server time in milliseconds
    pub async fn time(&self) -> Result<i64, ExchangeError> {
        let text = self.call(instruction::TIME, &Params::new()).await?.into_text();
        text.trim().parse().map_err(|e| {
            ExchangeError::DeserializationError(format!("Invalid server time '{}': {}", text, e))
        })
    }
}
