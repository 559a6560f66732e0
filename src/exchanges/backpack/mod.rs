//! Backpack exchange REST client.
//!
//! ```rust,no_run
//! use lotusx_backpack::core::config::ExchangeConfig;
//! use lotusx_backpack::exchanges::backpack::build_client;
//!
//! # async fn example() -> Result<(), lotusx_backpack::ExchangeError> {
//! let client = build_client(ExchangeConfig::from_env("BACKPACK")?)?;
//! let balances = client.balances().await?;
//! println!("{} assets", balances.len());
//! # Ok(())
//! # }
//! ```
pub mod account;
pub mod builder;
pub mod client;
pub mod endpoints;
pub mod market_data;
pub mod trading;
pub mod types;

pub use builder::{build_client, BackpackBuilder};
pub use client::BackpackClient;
pub use endpoints::instruction;
pub use types::{
    BackpackBalance, BackpackBalanceMap, BackpackDepth, BackpackFill, BackpackKline,
    BackpackMarket, BackpackOrder, BackpackStatus, BackpackTicker, BackpackTrade, OrderRef,
    OrderRequest, OrderType, Side, TimeInForce,
};
