//! Strategy command: list, set, and remove buy/sell levels

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rust_decimal::Decimal;

use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::strategy::{StrategyLevels, StrategyStore};

#[derive(Args, Debug)]
pub struct StrategyArgs {
    #[command(subcommand)]
    pub action: StrategyAction,
}

#[derive(Subcommand, Debug)]
pub enum StrategyAction {
    /// List configured strategy levels
    List,

    /// Set levels for an asset; omitted levels keep their current value
    Set {
        /// Asset symbol (e.g. BTC)
        asset: String,

        #[arg(long)]
        low_buy_1: Option<Decimal>,

        #[arg(long)]
        low_buy_2: Option<Decimal>,

        #[arg(long)]
        high_sell_1: Option<Decimal>,

        #[arg(long)]
        high_sell_2: Option<Decimal>,
    },

    /// Remove an asset's levels
    Remove {
        /// Asset symbol (e.g. BTC)
        asset: String,
    },
}

pub struct StrategyCommand {
    args: StrategyArgs,
}

impl StrategyCommand {
    pub fn new(args: StrategyArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, data_paths: DataPaths) -> Result<()> {
        init_logging(LoggingConfig::new(
            LogMode::ConsoleAndFile,
            data_paths.clone(),
        ))?;

        let store = StrategyStore::new(&data_paths);

        match &self.args.action {
            StrategyAction::List => {
                let book = store.load().await?;
                if book.is_empty() {
                    println!(
                        "No strategy levels configured. Add one with 'binfolio strategy set'."
                    );
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec![
                        "Asset",
                        "Low Buy 1",
                        "Low Buy 2",
                        "High Sell 1",
                        "High Sell 2",
                    ]);
                for (asset, levels) in &book {
                    table.add_row(vec![
                        asset.clone(),
                        level_cell(levels.low_buy_1),
                        level_cell(levels.low_buy_2),
                        level_cell(levels.high_sell_1),
                        level_cell(levels.high_sell_2),
                    ]);
                }
                println!("{table}");
            }
            StrategyAction::Set {
                asset,
                low_buy_1,
                low_buy_2,
                high_sell_1,
                high_sell_2,
            } => {
                let book = store.load().await?;
                let current = book
                    .get(&asset.to_uppercase())
                    .cloned()
                    .unwrap_or_default();

                let merged = StrategyLevels {
                    low_buy_1: (*low_buy_1).or(current.low_buy_1),
                    low_buy_2: (*low_buy_2).or(current.low_buy_2),
                    high_sell_1: (*high_sell_1).or(current.high_sell_1),
                    high_sell_2: (*high_sell_2).or(current.high_sell_2),
                };
                if merged.is_empty() {
                    println!("No levels given; nothing saved. Pass e.g. --low-buy-1 60000.");
                    return Ok(());
                }

                store.set(asset, merged).await?;
                println!("Saved strategy levels for {}.", asset.to_uppercase());
            }
            StrategyAction::Remove { asset } => {
                if store.remove(asset).await? {
                    println!("Removed strategy levels for {}.", asset.to_uppercase());
                } else {
                    println!("No strategy levels found for {}.", asset.to_uppercase());
                }
            }
        }

        Ok(())
    }
}

fn level_cell(level: Option<Decimal>) -> String {
    match level {
        Some(level) => format!("{:.4}", level),
        None => "-".to_string(),
    }
}
