use crate::core::kernel::{HttpMethod, OperationRegistry};

/// Operation names, as used both for lookup and in the signed message
pub mod instruction {
    pub const ASSETS: &str = "assets";
    pub const MARKETS: &str = "markets";
    pub const TICKER: &str = "ticker";
    pub const TICKERS: &str = "tickers";
    pub const DEPTH: &str = "depth";
    pub const KLINES: &str = "klines";
    pub const STATUS: &str = "status";
    pub const PING: &str = "ping";
    pub const TIME: &str = "time";
    pub const RECENT_TRADES: &str = "recentTrades";
    pub const HISTORICAL_TRADES: &str = "historicalTrades";

    pub const BALANCE_QUERY: &str = "balanceQuery";
    pub const DEPOSIT_ADDRESS_QUERY: &str = "depositAddressQuery";
    pub const DEPOSIT_QUERY_ALL: &str = "depositQueryAll";
    pub const FILL_HISTORY_QUERY_ALL: &str = "fillHistoryQueryAll";
    pub const ORDER_CANCEL: &str = "orderCancel";
    pub const ORDER_CANCEL_ALL: &str = "orderCancelAll";
    pub const ORDER_EXECUTE: &str = "orderExecute";
    pub const ORDER_HISTORY_QUERY_ALL: &str = "orderHistoryQueryAll";
    pub const ORDER_QUERY: &str = "orderQuery";
    pub const ORDER_QUERY_ALL: &str = "orderQueryAll";
    pub const WITHDRAW: &str = "withdraw";
    pub const WITHDRAWAL_QUERY_ALL: &str = "withdrawalQueryAll";
}

/// Backpack REST operations rooted at `base_url`
pub fn registry(base_url: &str) -> OperationRegistry {
    use instruction::*;
    use HttpMethod::{Delete, Get, Post};

    OperationRegistry::builder(base_url)
        .public(ASSETS, Get, "/api/v1/assets")
        .public(MARKETS, Get, "/api/v1/markets")
        .public(TICKER, Get, "/api/v1/ticker")
        .public(TICKERS, Get, "/api/v1/tickers")
        .public(DEPTH, Get, "/api/v1/depth")
        .public(KLINES, Get, "/api/v1/klines")
        .public(STATUS, Get, "/api/v1/status")
        .public(PING, Get, "/api/v1/ping")
        .public(TIME, Get, "/api/v1/time")
        .public(RECENT_TRADES, Get, "/api/v1/trades")
        .public(HISTORICAL_TRADES, Get, "/api/v1/trades/history")
        .private(BALANCE_QUERY, Get, "/api/v1/capital")
        .private(DEPOSIT_ADDRESS_QUERY, Get, "/wapi/v1/capital/deposit/address")
        .private(DEPOSIT_QUERY_ALL, Get, "/wapi/v1/capital/deposits")
        .private(FILL_HISTORY_QUERY_ALL, Get, "/wapi/v1/history/fills")
        .private(ORDER_CANCEL, Delete, "/api/v1/order")
        .private(ORDER_CANCEL_ALL, Delete, "/api/v1/orders")
        .private(ORDER_EXECUTE, Post, "/api/v1/order")
        .private(ORDER_HISTORY_QUERY_ALL, Get, "/wapi/v1/history/orders")
        .private(ORDER_QUERY, Get, "/api/v1/order")
        .private(ORDER_QUERY_ALL, Get, "/api/v1/orders")
        .private(WITHDRAW, Post, "/wapi/v1/capital/withdrawals")
        .private(WITHDRAWAL_QUERY_ALL, Get, "/wapi/v1/capital/withdrawals")
        .build()
}
