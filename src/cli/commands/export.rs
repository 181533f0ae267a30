//! Export command: write the portfolio summary as CSV

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::binance::BinanceClient;
use crate::cli::commands::parse_source_filter;
use crate::config::AppConfig;
use crate::data_paths::DataPaths;
use crate::fetch;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::portfolio::export::write_csv;
use crate::portfolio::{build_summary, SellFeePolicy};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Comma-separated product sources to include
    #[arg(long)]
    pub sources: Option<String>,

    /// Attribute sell fees to the remaining cost basis instead of deducting
    /// them from sale proceeds
    #[arg(long)]
    pub sell_fee_from_basis: bool,
}

pub struct ExportCommand {
    args: ExportArgs,
}

impl ExportCommand {
    pub fn new(args: ExportArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, quote: &str, data_paths: DataPaths) -> Result<()> {
        // File-only logging keeps stdout clean for the CSV stream.
        init_logging(LoggingConfig::new(LogMode::FileOnly, data_paths))?;

        let config = AppConfig::from_env()?;
        let client = BinanceClient::new(&config);
        let filter = parse_source_filter(self.args.sources.as_deref())?;
        let policy = if self.args.sell_fee_from_basis {
            SellFeePolicy::FromBasis
        } else {
            SellFeePolicy::FromProceeds
        };

        let inputs = fetch::load_inputs(&client, quote, &filter).await?;
        let summary = build_summary(&inputs, &filter, policy);

        match &self.args.output {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                write_csv(&summary, file)?;
                info!(path = %path.display(), rows = summary.rows.len(), "CSV export written");
                eprintln!("Exported {} rows to {}", summary.rows.len(), path.display());
            }
            None => {
                write_csv(&summary, std::io::stdout().lock())?;
            }
        }

        Ok(())
    }
}
