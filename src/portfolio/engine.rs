//! The portfolio pipeline: normalize, replay ledgers, value, aggregate
//!
//! Pure function of its inputs. Holds no state across invocations, so
//! concurrent refreshes with different snapshots never interfere.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;

use crate::portfolio::aggregator::aggregate;
use crate::portfolio::cost_basis::{compute_cost_basis, SellFeePolicy};
use crate::portfolio::error::PortfolioError;
use crate::portfolio::normalizer::{normalize_holdings, SourceFilter};
use crate::portfolio::types::{
    AssetOutcome, AssetRow, PortfolioSummary, Position, RawHolding, Transaction,
};
use crate::portfolio::valuation::value_position;

/// A point-in-time snapshot of everything the engine needs.
#[derive(Debug, Clone, Default)]
pub struct PortfolioInputs {
    /// Raw holdings from every fetched account product.
    pub holdings: Vec<RawHolding>,
    /// Full trade history per asset, in any order; the calculator re-sorts.
    pub histories: HashMap<String, Vec<Transaction>>,
    /// Current market price per asset. A missing entry means the price
    /// lookup failed; the asset is reported unpriced, never valued at zero.
    pub prices: HashMap<String, Decimal>,
}

/// Run the full pipeline over one snapshot.
///
/// Assets come from the normalized holdings first (in discovery order), then
/// from ledgers with no matching holding (alphabetically — a fully sold asset
/// still has reportable realized P&L). Each asset computes independently: a
/// bad ledger yields a `Failed` row, a bad or missing price an unpriced row,
/// and neither disturbs any other asset or the aggregate totals.
pub fn build_summary(
    inputs: &PortfolioInputs,
    filter: &SourceFilter,
    policy: SellFeePolicy,
) -> PortfolioSummary {
    let positions = normalize_holdings(&inputs.holdings, filter);

    let mut assets: Vec<String> = Vec::new();
    let mut by_asset: HashMap<String, Vec<Position>> = HashMap::new();
    for position in positions {
        if !by_asset.contains_key(&position.asset) {
            assets.push(position.asset.clone());
        }
        by_asset
            .entry(position.asset.clone())
            .or_default()
            .push(position);
    }

    let mut history_only: Vec<&String> = inputs
        .histories
        .keys()
        .filter(|asset| !by_asset.contains_key(*asset))
        .collect();
    history_only.sort();
    assets.extend(history_only.into_iter().cloned());

    let rows = assets
        .into_iter()
        .map(|asset| {
            let sources = by_asset.remove(&asset).unwrap_or_default();
            let quantity: Decimal = sources.iter().map(|p| p.quantity).sum();
            let outcome = compute_asset(&asset, inputs, policy);
            AssetRow {
                asset,
                quantity,
                sources,
                outcome,
            }
        })
        .collect();

    aggregate(rows)
}

fn compute_asset(asset: &str, inputs: &PortfolioInputs, policy: SellFeePolicy) -> AssetOutcome {
    static EMPTY: Vec<Transaction> = Vec::new();
    let history = inputs.histories.get(asset).unwrap_or(&EMPTY);

    let cost = match compute_cost_basis(asset, history, policy) {
        Ok(cost) => cost,
        Err(error) => {
            warn!(asset, %error, "cost basis calculation failed");
            return AssetOutcome::Failed { error };
        }
    };

    let price = inputs.prices.get(asset).copied();
    let valuation = match value_position(&cost, price) {
        Ok(valuation) => valuation,
        Err(error @ PortfolioError::InvalidPrice { .. }) => {
            // A bogus quote degrades to the unpriced state; the asset keeps
            // its row and stays out of the totals.
            warn!(asset, %error, "discarding non-positive market price");
            match value_position(&cost, None) {
                Ok(valuation) => valuation,
                Err(error) => return AssetOutcome::Failed { error },
            }
        }
        Err(error) => {
            warn!(asset, %error, "valuation failed");
            return AssetOutcome::Failed { error };
        }
    };

    AssetOutcome::Computed { cost, valuation }
}
