//! User-defined buy/sell level persistence
//!
//! Levels live in `strategies.json` under the data directory, keyed by
//! upper-cased asset, and are edited through the `strategy` subcommand. The
//! engine never reads this file; only the alert evaluator consumes it.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::data_paths::DataPaths;

/// Price levels tracked for one asset. Unset levels never trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_buy_1: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_buy_2: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_sell_1: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_sell_2: Option<Decimal>,
}

impl StrategyLevels {
    pub fn is_empty(&self) -> bool {
        self.low_buy_1.is_none()
            && self.low_buy_2.is_none()
            && self.high_sell_1.is_none()
            && self.high_sell_2.is_none()
    }
}

/// Map of asset to its configured levels. BTreeMap keeps the file sorted and
/// diffs stable across saves.
pub type StrategyBook = BTreeMap<String, StrategyLevels>;

/// File-backed store for strategy levels
#[derive(Clone)]
pub struct StrategyStore {
    path: PathBuf,
}

impl StrategyStore {
    pub fn new(data_paths: &DataPaths) -> Self {
        Self {
            path: data_paths.strategies_file(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the book; a missing file is an empty book, not an error.
    pub async fn load(&self) -> Result<StrategyBook> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no strategies file yet");
            return Ok(StrategyBook::new());
        }
        let contents = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    pub async fn save(&self, book: &StrategyBook) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(book).context("failed to serialize strategies")?;
        fs::write(&self.path, contents)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Set (or replace) the levels for one asset.
    pub async fn set(&self, asset: &str, levels: StrategyLevels) -> Result<()> {
        let mut book = self.load().await?;
        book.insert(asset.to_uppercase(), levels);
        self.save(&book).await
    }

    /// Remove an asset's levels. Returns whether anything was removed.
    pub async fn remove(&self, asset: &str) -> Result<bool> {
        let mut book = self.load().await?;
        let removed = book.remove(&asset.to_uppercase()).is_some();
        if removed {
            self.save(&book).await?;
        }
        Ok(removed)
    }
}
