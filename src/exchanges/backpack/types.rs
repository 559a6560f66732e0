use crate::core::types::{ParamValue, Params};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Accept a string or a number and keep it as a string.
///
/// Identifiers like order ids are numeric strings on the wire and come out
/// of numeric coercion as JSON numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// Market data

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackMarket {
    pub symbol: String,
    pub base_symbol: String,
    pub quote_symbol: String,
    #[serde(default)]
    pub market_type: Option<String>,
    #[serde(default)]
    pub order_book_state: Option<String>,
    #[serde(default)]
    pub filters: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackTicker {
    pub symbol: String,
    pub first_price: Decimal,
    pub last_price: Decimal,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    #[serde(default)]
    pub trades: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackDepth {
    pub asks: Vec<(Decimal, Decimal)>,
    pub bids: Vec<(Decimal, Decimal)>,
    #[serde(deserialize_with = "string_or_number")]
    pub last_update_id: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackKline {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default)]
    pub quote_volume: Option<Decimal>,
    #[serde(default)]
    pub trades: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackTrade {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    pub price: Decimal,
    pub quantity: Decimal,
    pub quote_quantity: Decimal,
    pub timestamp: i64,
    pub is_buyer_maker: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackpackStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

// Account

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackpackBalance {
    pub available: Decimal,
    pub locked: Decimal,
    #[serde(default)]
    pub staked: Decimal,
}

/// Balances keyed by asset symbol
pub type BackpackBalanceMap = HashMap<String, BackpackBalance>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackpackDepositAddress {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackFill {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub trade_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub fee: Decimal,
    pub fee_symbol: String,
    pub is_maker: bool,
    pub timestamp: String,
}

// Trading

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "Bid",
            Self::Ask => "Ask",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Market => "Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
}

impl TimeInForce {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

/// New order parameters for `orderExecute`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Option<Decimal>,
    pub quote_quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub trigger_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub client_id: Option<u32>,
    pub post_only: Option<bool>,
    pub reduce_only: Option<bool>,
}

impl OrderRequest {
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            quantity: Some(quantity),
            price: Some(price),
            ..Self::new(symbol, side, OrderType::Limit)
        }
    }

    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::new(symbol, side, OrderType::Market)
        }
    }

    fn new(symbol: impl Into<String>, side: Side, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity: None,
            quote_quantity: None,
            price: None,
            trigger_price: None,
            time_in_force: None,
            client_id: None,
            post_only: None,
            reduce_only: None,
        }
    }

    #[must_use]
    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    #[must_use]
    pub fn client_id(mut self, client_id: u32) -> Self {
        self.client_id = Some(client_id);
        self
    }

    #[must_use]
    pub fn post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("symbol", self.symbol.as_str())
            .with("side", self.side.as_str())
            .with("orderType", self.order_type.as_str())
            .with_opt("quantity", self.quantity)
            .with_opt("quoteQuantity", self.quote_quantity)
            .with_opt("price", self.price)
            .with_opt("triggerPrice", self.trigger_price)
            .with_opt("timeInForce", self.time_in_force.map(TimeInForce::as_str))
            .with_opt("clientId", self.client_id)
            .with_opt("postOnly", self.post_only)
            .with_opt("reduceOnly", self.reduce_only)
    }
}

/// Identifies an existing order by exchange id or client id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRef {
    OrderId(String),
    ClientId(u32),
}

impl OrderRef {
    pub(crate) fn insert_into(&self, params: &mut Params) {
        match self {
            Self::OrderId(id) => params.insert("orderId", ParamValue::String(id.clone())),
            Self::ClientId(id) => params.insert("clientId", *id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackpackOrder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub client_id: Option<u64>,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub status: String,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub executed_quantity: Option<Decimal>,
    #[serde(default)]
    pub executed_quote_quantity: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub trigger_price: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub post_only: Option<bool>,
    #[serde(default)]
    pub created_at: Option<i64>,
}
