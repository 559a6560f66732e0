pub mod core;
pub mod exchanges;

pub use self::core::{
    config::ExchangeConfig,
    errors::{ExchangeError, TransportError},
    types::{ParamValue, Params},
};
pub use exchanges::backpack::{build_client, BackpackBuilder, BackpackClient};
