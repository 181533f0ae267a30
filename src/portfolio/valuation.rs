//! Market valuation of cost-basis results

use rust_decimal::Decimal;

use crate::portfolio::error::PortfolioError;
use crate::portfolio::types::{CostBasisResult, ValuationResult};

/// Value a position at the current market price.
///
/// `market_price: None` means the price lookup failed upstream; the result
/// carries the unpriced marker and the caller excludes it from portfolio
/// totals. A supplied price must be strictly positive, otherwise the call
/// fails with `InvalidPrice` and the caller downgrades the asset to unpriced.
/// A fully closed position (nothing remaining) values to zero without error.
pub fn value_position(
    cost: &CostBasisResult,
    market_price: Option<Decimal>,
) -> Result<ValuationResult, PortfolioError> {
    let price = match market_price {
        Some(price) if price <= Decimal::ZERO => {
            return Err(PortfolioError::InvalidPrice {
                asset: cost.asset.clone(),
                price,
            });
        }
        Some(price) => price,
        None => {
            return Ok(ValuationResult {
                asset: cost.asset.clone(),
                market_price: None,
                market_value: None,
                unrealized_pnl: None,
                roi_pct: None,
            });
        }
    };

    let market_value = cost.remaining_quantity * price;
    let invested = cost.invested();
    let unrealized_pnl = market_value - invested;
    let roi_pct = if invested > Decimal::ZERO {
        Some(unrealized_pnl / invested * Decimal::ONE_HUNDRED)
    } else {
        None
    };

    Ok(ValuationResult {
        asset: cost.asset.clone(),
        market_price: Some(price),
        market_value: Some(market_value),
        unrealized_pnl: Some(unrealized_pnl),
        roi_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cost(remaining: Decimal, average: Decimal) -> CostBasisResult {
        CostBasisResult {
            asset: "ETH".to_string(),
            average_cost: average,
            remaining_quantity: remaining,
            realized_pnl: Decimal::ZERO,
        }
    }

    #[test]
    fn values_open_position() {
        let result = value_position(&cost(dec!(2), dec!(100)), Some(dec!(150))).unwrap();

        assert_eq!(result.market_value, Some(dec!(300)));
        assert_eq!(result.unrealized_pnl, Some(dec!(100)));
        assert_eq!(result.roi_pct, Some(dec!(50)));
    }

    #[test]
    fn missing_price_stays_distinct_from_zero() {
        let result = value_position(&cost(dec!(2), dec!(100)), None).unwrap();

        assert_eq!(result.market_price, None);
        assert_eq!(result.market_value, None);
        assert_eq!(result.unrealized_pnl, None);
        assert_eq!(result.roi_pct, None);
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let error = value_position(&cost(dec!(1), dec!(100)), Some(dec!(0))).unwrap_err();

        assert_eq!(
            error,
            PortfolioError::InvalidPrice {
                asset: "ETH".to_string(),
                price: dec!(0),
            }
        );
    }

    #[test]
    fn closed_position_values_to_zero_without_error() {
        let result = value_position(&cost(dec!(0), dec!(0)), Some(dec!(150))).unwrap();

        assert_eq!(result.market_value, Some(dec!(0)));
        assert_eq!(result.unrealized_pnl, Some(dec!(0)));
        assert_eq!(result.roi_pct, None);
    }

    #[test]
    fn zero_basis_holding_has_no_roi() {
        // Held quantity with a zero average cost (free acquisition): value it,
        // but an ROI over a zero denominator is not applicable.
        let result = value_position(&cost(dec!(5), dec!(0)), Some(dec!(10))).unwrap();

        assert_eq!(result.market_value, Some(dec!(50)));
        assert_eq!(result.unrealized_pnl, Some(dec!(50)));
        assert_eq!(result.roi_pct, None);
    }
}
