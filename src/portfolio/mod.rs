//! Portfolio valuation and P&L engine
//!
//! Normalizes raw per-product holdings, replays per-asset trade ledgers with
//! the weighted-average cost method, values positions at current market
//! prices, and rolls everything up into the summary consumed by the CLI and
//! the strategy-alert evaluator.

pub mod aggregator;
pub mod cost_basis;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod types;
pub mod valuation;

pub use aggregator::aggregate;
pub use cost_basis::{compute_cost_basis, SellFeePolicy};
pub use engine::{build_summary, PortfolioInputs};
pub use error::PortfolioError;
pub use normalizer::{normalize_holdings, SourceFilter};
pub use types::{
    AssetOutcome, AssetRow, CostBasisResult, PortfolioSummary, PortfolioTotals, Position,
    PositionSource, RawHolding, Transaction, TransactionSide, ValuationResult,
};
pub use valuation::value_position;
