use lotusx_backpack::{build_client, ExchangeConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // BACKPACK_API_KEY / BACKPACK_SECRET_KEY from .env or the environment
    let config = ExchangeConfig::from_env_file("BACKPACK").unwrap_or_else(|e| {
        warn!("No credentials ({}), continuing with public endpoints only", e);
        ExchangeConfig::read_only()
    });

    let client = build_client(config)?;

    println!("ping: {}", client.ping().await?);
    println!("server time: {}", client.time().await?);

    let status = client.status().await?;
    println!("status: {}", status.status);

    let markets = client.markets().await?;
    println!("{} markets", markets.len());
    for market in markets.iter().take(5) {
        println!("  {} ({}/{})", market.symbol, market.base_symbol, market.quote_symbol);
    }

    let ticker = client.ticker("SOL_USDC").await?;
    println!(
        "SOL_USDC last {} ({}% 24h)",
        ticker.last_price, ticker.price_change_percent
    );

    let depth = client.depth("SOL_USDC").await?;
    if let (Some(bid), Some(ask)) = (depth.bids.last(), depth.asks.first()) {
        println!("best bid {} / best ask {}", bid.0, ask.0);
    }

    if client.can_authenticate() {
        let balances = client.balances().await?;
        for (asset, balance) in &balances {
            println!("  {}: {} available, {} locked", asset, balance.available, balance.locked);
        }

        let open = client.open_orders(Some("SOL_USDC")).await?;
        info!(count = open.len(), "open SOL_USDC orders");
    } else {
        info!("Skipping account queries for a read-only client");
    }

    Ok(())
}
