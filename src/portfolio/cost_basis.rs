//! Weighted-average cost basis over a per-asset trade ledger

use rust_decimal::Decimal;

use crate::portfolio::error::PortfolioError;
use crate::portfolio::types::{CostBasisResult, Transaction, TransactionSide};

/// How a sell-side fee is attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellFeePolicy {
    /// Deduct the fee from the sale proceeds, lowering realized P&L at sale
    /// time.
    #[default]
    FromProceeds,
    /// Fold the fee into the remaining position's cost basis, deferring it to
    /// future sales. Falls back to `FromProceeds` when the sale closes the
    /// position, since a closed position has no basis left to carry it.
    FromBasis,
}

/// Replay one asset's ledger with the weighted-average cost method.
///
/// Buys accumulate `quantity * price + fee` into the running cost; sells
/// realize `quantity * (price - average_cost)` against the average cost at
/// sale time, with the fee attributed per `policy`. The ledger is re-sorted
/// by `(timestamp, sequence)` before replay so the result does not depend on
/// arrival order. An empty ledger yields the zero result.
///
/// A sell exceeding the tracked holding fails with `Overdraft` rather than
/// clamping. Entries with a non-positive quantity, or a negative price or
/// fee, fail with `InvalidTransaction`. A zero price is legal (promotional
/// distributions trade at zero).
pub fn compute_cost_basis(
    asset: &str,
    transactions: &[Transaction],
    policy: SellFeePolicy,
) -> Result<CostBasisResult, PortfolioError> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| (tx.timestamp, tx.sequence));

    let mut total_quantity = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;
    let mut realized_pnl = Decimal::ZERO;

    for tx in ordered {
        if tx.quantity <= Decimal::ZERO {
            return Err(PortfolioError::InvalidTransaction {
                asset: asset.to_string(),
                sequence: tx.sequence,
                reason: format!("non-positive quantity {}", tx.quantity),
            });
        }
        if tx.price < Decimal::ZERO {
            return Err(PortfolioError::InvalidTransaction {
                asset: asset.to_string(),
                sequence: tx.sequence,
                reason: format!("negative price {}", tx.price),
            });
        }
        if tx.fee < Decimal::ZERO {
            return Err(PortfolioError::InvalidTransaction {
                asset: asset.to_string(),
                sequence: tx.sequence,
                reason: format!("negative fee {}", tx.fee),
            });
        }

        match tx.side {
            TransactionSide::Buy => {
                total_cost += tx.quantity * tx.price + tx.fee;
                total_quantity += tx.quantity;
            }
            TransactionSide::Sell => {
                if tx.quantity > total_quantity {
                    return Err(PortfolioError::Overdraft {
                        asset: asset.to_string(),
                        sell_quantity: tx.quantity,
                        held_quantity: total_quantity,
                    });
                }
                // total_quantity > 0 here: quantity is positive and bounded
                // by the holding.
                let average_cost = total_cost / total_quantity;
                realized_pnl += tx.quantity * (tx.price - average_cost);
                total_quantity -= tx.quantity;
                total_cost -= tx.quantity * average_cost;

                match policy {
                    SellFeePolicy::FromBasis if !total_quantity.is_zero() => {
                        total_cost += tx.fee;
                    }
                    _ => realized_pnl -= tx.fee,
                }
            }
        }
    }

    let average_cost = if total_quantity.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / total_quantity
    };

    Ok(CostBasisResult {
        asset: asset.to_string(),
        average_cost,
        remaining_quantity: total_quantity,
        realized_pnl,
    })
}
