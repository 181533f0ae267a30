//! Roll-up of per-asset results into the portfolio summary

use rust_decimal::Decimal;

use crate::portfolio::types::{AssetOutcome, AssetRow, PortfolioSummary, PortfolioTotals};

/// Build the portfolio summary from per-asset rows.
///
/// Totals are plain sums over the priced, successfully computed rows, so they
/// are independent of processing order. Unpriced and failed assets keep their
/// rows and are listed separately; they never contribute to the totals.
///
/// Row order: priced rows by descending market value, then unpriced and
/// failed rows in their discovery order. The sort is stable, so identical
/// inputs always produce identical output.
pub fn aggregate(mut rows: Vec<AssetRow>) -> PortfolioSummary {
    let mut totals = PortfolioTotals::default();
    let mut unpriced_assets = Vec::new();
    let mut failed_assets = Vec::new();

    for row in &rows {
        match &row.outcome {
            AssetOutcome::Computed { cost, valuation } => match valuation.market_value {
                Some(market_value) => {
                    totals.total_cost_basis += cost.invested();
                    totals.total_market_value += market_value;
                    totals.total_unrealized_pnl +=
                        valuation.unrealized_pnl.unwrap_or(Decimal::ZERO);
                    totals.total_realized_pnl += cost.realized_pnl;
                }
                None => unpriced_assets.push(row.asset.clone()),
            },
            AssetOutcome::Failed { .. } => failed_assets.push(row.asset.clone()),
        }
    }

    rows.sort_by(|a, b| match (a.market_value(), b.market_value()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    PortfolioSummary {
        rows,
        totals,
        unpriced_assets,
        failed_assets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::error::PortfolioError;
    use crate::portfolio::types::{CostBasisResult, ValuationResult};
    use rust_decimal_macros::dec;

    fn priced_row(asset: &str, quantity: Decimal, average: Decimal, price: Decimal) -> AssetRow {
        let cost = CostBasisResult {
            asset: asset.to_string(),
            average_cost: average,
            remaining_quantity: quantity,
            realized_pnl: dec!(10),
        };
        let valuation =
            crate::portfolio::valuation::value_position(&cost, Some(price)).unwrap();
        AssetRow {
            asset: asset.to_string(),
            quantity,
            sources: Vec::new(),
            outcome: AssetOutcome::Computed { cost, valuation },
        }
    }

    fn unpriced_row(asset: &str, quantity: Decimal, average: Decimal) -> AssetRow {
        let cost = CostBasisResult {
            asset: asset.to_string(),
            average_cost: average,
            remaining_quantity: quantity,
            realized_pnl: dec!(5),
        };
        AssetRow {
            asset: asset.to_string(),
            quantity,
            sources: Vec::new(),
            outcome: AssetOutcome::Computed {
                cost,
                valuation: ValuationResult {
                    asset: asset.to_string(),
                    market_price: None,
                    market_value: None,
                    unrealized_pnl: None,
                    roi_pct: None,
                },
            },
        }
    }

    fn failed_row(asset: &str) -> AssetRow {
        AssetRow {
            asset: asset.to_string(),
            quantity: dec!(1),
            sources: Vec::new(),
            outcome: AssetOutcome::Failed {
                error: PortfolioError::Overdraft {
                    asset: asset.to_string(),
                    sell_quantity: dec!(5),
                    held_quantity: dec!(3),
                },
            },
        }
    }

    #[test]
    fn orders_priced_rows_by_descending_market_value() {
        let summary = aggregate(vec![
            priced_row("ADA", dec!(10), dec!(1), dec!(2)), // value 20
            priced_row("BTC", dec!(1), dec!(100), dec!(200)), // value 200
            priced_row("ETH", dec!(2), dec!(30), dec!(40)), // value 80
        ]);

        let order: Vec<&str> = summary.rows.iter().map(|r| r.asset.as_str()).collect();
        assert_eq!(order, vec!["BTC", "ETH", "ADA"]);
    }

    #[test]
    fn unpriced_rows_go_last_in_discovery_order() {
        let summary = aggregate(vec![
            unpriced_row("ZRX", dec!(1), dec!(1)),
            priced_row("BTC", dec!(1), dec!(100), dec!(200)),
            unpriced_row("ATOM", dec!(1), dec!(1)),
        ]);

        let order: Vec<&str> = summary.rows.iter().map(|r| r.asset.as_str()).collect();
        assert_eq!(order, vec!["BTC", "ZRX", "ATOM"]);
        assert_eq!(summary.unpriced_assets, vec!["ZRX", "ATOM"]);
    }

    #[test]
    fn totals_cover_priced_rows_only() {
        let summary = aggregate(vec![
            priced_row("BTC", dec!(1), dec!(100), dec!(200)),
            priced_row("ETH", dec!(2), dec!(30), dec!(40)),
            unpriced_row("ZRX", dec!(4), dec!(25)),
        ]);

        assert_eq!(summary.totals.total_market_value, dec!(280));
        assert_eq!(summary.totals.total_cost_basis, dec!(160));
        assert_eq!(summary.totals.total_unrealized_pnl, dec!(120));
        assert_eq!(summary.totals.total_realized_pnl, dec!(20));
    }

    #[test]
    fn totals_are_permutation_invariant() {
        let rows = || {
            vec![
                priced_row("BTC", dec!(1), dec!(100), dec!(200)),
                priced_row("ETH", dec!(2), dec!(30), dec!(40)),
                priced_row("ADA", dec!(10), dec!(1), dec!(2)),
            ]
        };
        let forward = aggregate(rows());
        let mut reversed_rows = rows();
        reversed_rows.reverse();
        let reversed = aggregate(reversed_rows);

        assert_eq!(forward.totals, reversed.totals);
    }

    #[test]
    fn failed_rows_are_flagged_and_kept() {
        let summary = aggregate(vec![
            priced_row("BTC", dec!(1), dec!(100), dec!(200)),
            failed_row("DOGE"),
        ]);

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.failed_assets, vec!["DOGE"]);
        assert_eq!(summary.totals.total_market_value, dec!(200));
    }
}
