//! Portfolio type definitions with strong typing

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::portfolio::error::PortfolioError;

/// Transaction side (buy/sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionSide {
    Buy,
    Sell,
}

/// A single executed trade in an asset's ledger.
///
/// Ledgers are replayed in `(timestamp, sequence)` order; the sequence number
/// breaks timestamp ties so replay is deterministic regardless of arrival
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub asset: String,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub timestamp: DateTime<Utc>,
    pub sequence: u64,
}

/// Account product type a holding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSource {
    Spot,
    Earn,
    AutoInvest,
    DualInvest,
}

impl PositionSource {
    pub fn label(&self) -> &'static str {
        match self {
            PositionSource::Spot => "Spot",
            PositionSource::Earn => "Earn",
            PositionSource::AutoInvest => "Auto-Invest",
            PositionSource::DualInvest => "Dual Investment",
        }
    }
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PositionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spot" => Ok(PositionSource::Spot),
            "earn" | "staking" => Ok(PositionSource::Earn),
            "auto-invest" | "auto_invest" | "autoinvest" => Ok(PositionSource::AutoInvest),
            "dual-invest" | "dual_invest" | "dualinvest" => Ok(PositionSource::DualInvest),
            other => Err(format!("unknown position source '{}'", other)),
        }
    }
}

/// Raw holding record as reported by one account product.
///
/// Shapes vary per source (spot balances carry a locked portion, yield
/// products report a single amount), so every field the normalizer needs is
/// optional and validated there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHolding {
    pub source: PositionSource,
    pub asset: Option<String>,
    pub quantity: Option<Decimal>,
    pub locked: Option<Decimal>,
}

/// Canonical holding for one `(asset, source)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub asset: String,
    pub quantity: Decimal,
    pub source: PositionSource,
}

/// Outcome of replaying one asset's ledger with the weighted-average method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBasisResult {
    pub asset: String,
    /// Average acquisition price of the held quantity, fees included.
    /// Zero when nothing is held.
    pub average_cost: Decimal,
    pub remaining_quantity: Decimal,
    pub realized_pnl: Decimal,
}

impl CostBasisResult {
    /// Result for an asset with no trade history.
    pub fn empty(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            average_cost: Decimal::ZERO,
            remaining_quantity: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        }
    }

    /// Cost basis of the currently held quantity.
    pub fn invested(&self) -> Decimal {
        self.remaining_quantity * self.average_cost
    }
}

/// Market valuation of a held position.
///
/// `market_price` is `None` when no price was available for the asset; a
/// missing price is a valid state and must never collapse into a zero price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub asset: String,
    pub market_price: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub roi_pct: Option<Decimal>,
}

impl ValuationResult {
    pub fn is_priced(&self) -> bool {
        self.market_price.is_some()
    }
}

/// Per-asset calculation outcome.
///
/// A failed asset keeps its row so one bad ledger never blanks the rest of
/// the dashboard.
#[derive(Debug, Clone)]
pub enum AssetOutcome {
    Computed {
        cost: CostBasisResult,
        valuation: ValuationResult,
    },
    Failed {
        error: PortfolioError,
    },
}

/// One summary row: the unified holding for an asset plus its calculation
/// outcome and the per-source detail retained for display.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub asset: String,
    /// Quantity currently held across all included sources.
    pub quantity: Decimal,
    pub sources: Vec<Position>,
    pub outcome: AssetOutcome,
}

impl AssetRow {
    pub fn cost(&self) -> Option<&CostBasisResult> {
        match &self.outcome {
            AssetOutcome::Computed { cost, .. } => Some(cost),
            AssetOutcome::Failed { .. } => None,
        }
    }

    pub fn valuation(&self) -> Option<&ValuationResult> {
        match &self.outcome {
            AssetOutcome::Computed { valuation, .. } => Some(valuation),
            AssetOutcome::Failed { .. } => None,
        }
    }

    pub fn market_value(&self) -> Option<Decimal> {
        self.valuation().and_then(|v| v.market_value)
    }

    pub fn is_priced(&self) -> bool {
        self.valuation().map(|v| v.is_priced()).unwrap_or(false)
    }
}

/// Aggregate totals over the priced, successfully computed rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub total_cost_basis: Decimal,
    pub total_market_value: Decimal,
    pub total_unrealized_pnl: Decimal,
    pub total_realized_pnl: Decimal,
}

/// Full portfolio summary handed to the presentation layer.
///
/// Rows are ordered by descending market value with unpriced rows last, in
/// discovery order. Unpriced and failed assets are listed separately so they
/// can be flagged without corrupting the totals.
#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    pub rows: Vec<AssetRow>,
    pub totals: PortfolioTotals,
    pub unpriced_assets: Vec<String>,
    pub failed_assets: Vec<String>,
}

impl PortfolioSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
