//! CLI module for binfolio
//!
//! Uses clap for argument parsing and a structured command pattern: one Args
//! struct and one Command struct per subcommand, dispatched from here.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};

use commands::alerts::{AlertsArgs, AlertsCommand};
use commands::dashboard::{DashboardArgs, DashboardCommand};
use commands::export::{ExportArgs, ExportCommand};
use commands::strategy::{StrategyArgs, StrategyCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "binfolio")]
#[command(version)]
#[command(about = "Rust CLI portfolio dashboard for Binance accounts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Preferred quote asset for ticker matching (e.g. USDT, BUSD, BTC)
    #[arg(long, global = true, default_value = "USDT")]
    pub quote: String,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the portfolio dashboard with cost basis and P&L
    Dashboard(DashboardArgs),

    /// Export the portfolio summary as CSV
    Export(ExportArgs),

    /// Manage buy/sell strategy levels
    Strategy(StrategyArgs),

    /// Evaluate strategy levels and deliver alerts
    Alerts(AlertsArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);

        // Ensure all directories exist
        data_paths.ensure_directories()?;

        let quote = self.quote.to_uppercase();

        match self.command {
            Commands::Dashboard(args) => {
                DashboardCommand::new(args).execute(&quote, data_paths).await
            }
            Commands::Export(args) => ExportCommand::new(args).execute(&quote, data_paths).await,
            Commands::Strategy(args) => StrategyCommand::new(args).execute(data_paths).await,
            Commands::Alerts(args) => AlertsCommand::new(args).execute(&quote, data_paths).await,
            Commands::Version(args) => VersionCommand::new(args).execute().await,
        }
    }
}
