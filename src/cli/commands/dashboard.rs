//! Dashboard command: fetch the account snapshot, compute P&L, render it

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::binance::BinanceClient;
use crate::cli::commands::parse_source_filter;
use crate::config::AppConfig;
use crate::data_paths::DataPaths;
use crate::fetch;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::notify::TelegramNotifier;
use crate::portfolio::display::{format_movers, format_summary_table, format_totals};
use crate::portfolio::{build_summary, SellFeePolicy};
use crate::strategy::{evaluate_alerts, quotes_from_summary, StrategyStore};

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Comma-separated product sources to include
    /// (spot, earn, auto-invest, dual-invest); default is all of them
    #[arg(long)]
    pub sources: Option<String>,

    /// Attribute sell fees to the remaining cost basis instead of deducting
    /// them from sale proceeds
    #[arg(long)]
    pub sell_fee_from_basis: bool,

    /// Skip strategy alert evaluation
    #[arg(long)]
    pub no_alerts: bool,
}

pub struct DashboardCommand {
    args: DashboardArgs,
}

impl DashboardCommand {
    pub fn new(args: DashboardArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, quote: &str, data_paths: DataPaths) -> Result<()> {
        init_logging(LoggingConfig::new(
            LogMode::ConsoleAndFile,
            data_paths.clone(),
        ))?;

        let config = AppConfig::from_env()?;
        let client = BinanceClient::new(&config);
        let filter = parse_source_filter(self.args.sources.as_deref())?;
        let policy = if self.args.sell_fee_from_basis {
            SellFeePolicy::FromBasis
        } else {
            SellFeePolicy::FromProceeds
        };

        println!("\n📊 {}\n", "Binance Portfolio Dashboard".bold());

        let inputs = fetch::load_inputs(&client, quote, &filter).await?;
        let summary = build_summary(&inputs, &filter, policy);
        info!(
            assets = summary.rows.len(),
            unpriced = summary.unpriced_assets.len(),
            "portfolio summary computed"
        );

        println!("{}", format_totals(&summary));
        if let Some(movers) = format_movers(&summary) {
            println!("{}", movers);
        }
        println!("{}", format_summary_table(&summary));

        if !self.args.no_alerts && !summary.is_empty() {
            let book = StrategyStore::new(&data_paths).load().await?;
            let alerts = evaluate_alerts(&quotes_from_summary(&summary), &book);

            if alerts.is_empty() {
                println!("No strategy alerts triggered.");
            } else {
                println!("{}", "⚠ Strategy alerts".yellow().bold());
                for alert in &alerts {
                    println!("  {}", alert);
                }

                if let Some(notifier) = TelegramNotifier::from_config(&config) {
                    for alert in &alerts {
                        if let Err(error) = notifier.send(&alert.to_string()).await {
                            warn!(%error, asset = %alert.asset, "telegram delivery failed");
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
