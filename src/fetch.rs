//! Snapshot assembly: fetch balances, prices, and trade histories
//!
//! Gathers everything the engine needs into one `PortfolioInputs` snapshot.
//! Balances and prices download concurrently; per-symbol trade histories
//! download in parallel behind a progress bar. A failed trade lookup for one
//! symbol degrades to an empty history with a warning so the rest of the
//! snapshot survives.

use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::binance::{guess_symbol, split_symbol, BinanceClient};
use crate::portfolio::{normalize_holdings, PortfolioInputs, SourceFilter, Transaction};

pub async fn load_inputs(
    client: &BinanceClient,
    preferred_quote: &str,
    filter: &SourceFilter,
) -> Result<PortfolioInputs> {
    let (symbol_prices, spot) = tokio::try_join!(client.symbol_prices(), client.spot_balances())
        .context("unable to fetch balances and prices from Binance")?;

    let mut holdings = spot;
    holdings.extend(client.staking_positions().await);
    holdings.extend(client.auto_invest_positions().await);
    holdings.extend(client.dual_invest_positions().await);

    // Resolve each held asset to a ticker; unmatched assets stay in the
    // snapshot and surface as unpriced rows.
    let positions = normalize_holdings(&holdings, filter);
    let mut assets: Vec<String> = Vec::new();
    for position in &positions {
        if !assets.contains(&position.asset) {
            assets.push(position.asset.clone());
        }
    }

    let mut matched: Vec<(String, String)> = Vec::new();
    let mut prices: HashMap<String, rust_decimal::Decimal> = HashMap::new();
    for asset in &assets {
        match guess_symbol(asset, &symbol_prices, preferred_quote) {
            Some(symbol) => {
                if let Some(price) = symbol_prices.get(&symbol) {
                    prices.insert(asset.clone(), *price);
                }
                matched.push((asset.clone(), symbol));
            }
            None => info!(%asset, "no ticker found; asset will be reported unpriced"),
        }
    }

    let histories = fetch_histories(client, &matched, preferred_quote).await;

    Ok(PortfolioInputs {
        holdings,
        histories,
        prices,
    })
}

async fn fetch_histories(
    client: &BinanceClient,
    matched: &[(String, String)],
    preferred_quote: &str,
) -> HashMap<String, Vec<Transaction>> {
    let progress = ProgressBar::new(matched.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} trade history {pos}/{len} {wide_bar}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let downloads = matched.iter().map(|(asset, symbol)| {
        let progress = progress.clone();
        async move {
            let trades = match client.my_trades(symbol).await {
                Ok(trades) => trades,
                Err(error) => {
                    warn!(%symbol, %error, "unable to fetch trade history");
                    Vec::new()
                }
            };
            progress.inc(1);

            let (base, quote) = split_symbol(symbol)
                .unwrap_or_else(|| (asset.clone(), preferred_quote.to_uppercase()));
            let transactions: Vec<Transaction> = trades
                .into_iter()
                .map(|trade| trade.into_transaction(&base, &quote))
                .collect();
            (asset.clone(), transactions)
        }
    });

    let histories: HashMap<String, Vec<Transaction>> =
        join_all(downloads).await.into_iter().collect();
    progress.finish_and_clear();

    info!(
        assets = histories.len(),
        "trade history snapshot assembled"
    );
    histories
}
