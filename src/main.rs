use anyhow::Result;
use clap::Parser;

mod binance;
mod cli;
mod config;
mod data_paths;
mod fetch;
mod logging;
mod notify;
mod portfolio;
mod strategy;

#[tokio::main]
async fn main() -> Result<()> {
    // .env entries supplement the environment; a missing file is fine.
    dotenvy::dotenv().ok();

    // Each command initializes logging for its own output mode.
    let cli = cli::Cli::parse();

    match cli.execute().await {
        Ok(()) => {
            logging::log_session_end();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Application error: {}", e);
            let mut source = e.source();
            while let Some(err) = source {
                tracing::error!("   Caused by: {}", err);
                source = err.source();
            }
            logging::log_session_end();
            Err(e)
        }
    }
}
