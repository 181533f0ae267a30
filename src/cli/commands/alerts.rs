//! Alerts command: evaluate strategy levels and deliver notifications

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
use crate::portfolio::{build_summary, SellFeePolicy};
use crate::strategy::{evaluate_alerts, quotes_from_summary, StrategyStore};

#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Comma-separated product sources to include
    #[arg(long)]
    pub sources: Option<String>,

    /// Print alerts without delivering them
    #[arg(long)]
    pub dry_run: bool,
}

pub struct AlertsCommand {
    args: AlertsArgs,
}

impl AlertsCommand {
    pub fn new(args: AlertsArgs) -> Self {
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

        let book = StrategyStore::new(&data_paths).load().await?;
        if book.is_empty() {
            println!("No strategy levels configured; nothing to evaluate.");
            return Ok(());
        }

        let inputs = fetch::load_inputs(&client, quote, &filter).await?;
        let summary = build_summary(&inputs, &filter, SellFeePolicy::default());
        let alerts = evaluate_alerts(&quotes_from_summary(&summary), &book);

        if alerts.is_empty() {
            println!("No strategy alerts triggered.");
            return Ok(());
        }

        println!("{}", "⚠ Strategy alerts".yellow().bold());
        for alert in &alerts {
            println!("  {}", alert);
        }

        if self.args.dry_run {
            info!(count = alerts.len(), "dry run; alerts not delivered");
            return Ok(());
        }

        match TelegramNotifier::from_config(&config) {
            Some(notifier) => {
                for alert in &alerts {
                    if let Err(error) = notifier.send(&alert.to_string()).await {
                        warn!(%error, asset = %alert.asset, "telegram delivery failed");
                    }
                }
                info!(count = alerts.len(), "alerts delivered");
            }
            None => {
                println!("Telegram credentials missing; alerts shown locally only.");
            }
        }

        Ok(())
    }
}
