//! Evaluation of strategy levels against current prices

use rust_decimal::Decimal;
use std::fmt;

use crate::portfolio::PortfolioSummary;
use crate::strategy::levels::{StrategyBook, StrategyLevels};

/// The per-asset fields the engine exposes to the alert evaluator: current
/// price and ROI%, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub asset: String,
    pub price: Decimal,
    pub roi_pct: Option<Decimal>,
}

/// Extract the quotes for every priced row of a summary, in row order.
pub fn quotes_from_summary(summary: &PortfolioSummary) -> Vec<AssetQuote> {
    summary
        .rows
        .iter()
        .filter_map(|row| {
            let valuation = row.valuation()?;
            Some(AssetQuote {
                asset: row.asset.clone(),
                price: valuation.market_price?,
                roi_pct: valuation.roi_pct,
            })
        })
        .collect()
}

/// Which configured level was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    LowBuy1,
    LowBuy2,
    HighSell1,
    HighSell2,
}

impl LevelKind {
    pub fn label(&self) -> &'static str {
        match self {
            LevelKind::LowBuy1 => "Low Buy 1",
            LevelKind::LowBuy2 => "Low Buy 2",
            LevelKind::HighSell1 => "High Sell 1",
            LevelKind::HighSell2 => "High Sell 2",
        }
    }

    fn is_buy(&self) -> bool {
        matches!(self, LevelKind::LowBuy1 | LevelKind::LowBuy2)
    }
}

/// A crossed strategy level
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyAlert {
    pub asset: String,
    pub kind: LevelKind,
    pub threshold: Decimal,
    pub price: Decimal,
    pub roi_pct: Option<Decimal>,
}

impl fmt::Display for StrategyAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = if self.kind.is_buy() { "<=" } else { ">=" };
        write!(
            f,
            "{} reached {} at {:.4} {} {}",
            self.asset,
            self.kind.label(),
            self.price,
            relation,
            self.threshold,
        )?;
        if let Some(roi) = self.roi_pct {
            write!(f, " (ROI {:.2}%)", roi)?;
        }
        Ok(())
    }
}

fn levels_of(levels: &StrategyLevels) -> [(LevelKind, Option<Decimal>); 4] {
    [
        (LevelKind::LowBuy1, levels.low_buy_1),
        (LevelKind::LowBuy2, levels.low_buy_2),
        (LevelKind::HighSell1, levels.high_sell_1),
        (LevelKind::HighSell2, levels.high_sell_2),
    ]
}

/// Compare quotes against the configured levels. One alert per crossed
/// level, in quote order then level order, so repeated evaluations of the
/// same snapshot produce the same alerts.
pub fn evaluate_alerts(quotes: &[AssetQuote], book: &StrategyBook) -> Vec<StrategyAlert> {
    let mut alerts = Vec::new();

    for quote in quotes {
        let Some(levels) = book.get(&quote.asset.to_uppercase()) else {
            continue;
        };

        for (kind, threshold) in levels_of(levels) {
            let Some(threshold) = threshold else { continue };
            let crossed = if kind.is_buy() {
                quote.price <= threshold
            } else {
                quote.price >= threshold
            };
            if crossed {
                alerts.push(StrategyAlert {
                    asset: quote.asset.clone(),
                    kind,
                    threshold,
                    price: quote.price,
                    roi_pct: quote.roi_pct,
                });
            }
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(asset: &str, price: Decimal) -> AssetQuote {
        AssetQuote {
            asset: asset.to_string(),
            price,
            roi_pct: Some(dec!(10)),
        }
    }

    fn book_with(asset: &str, levels: StrategyLevels) -> StrategyBook {
        let mut book = StrategyBook::new();
        book.insert(asset.to_string(), levels);
        book
    }

    #[test]
    fn triggers_low_buy_at_or_below_threshold() {
        let book = book_with(
            "BTC",
            StrategyLevels {
                low_buy_1: Some(dec!(60000)),
                ..Default::default()
            },
        );

        let alerts = evaluate_alerts(&[quote("BTC", dec!(60000))], &book);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, LevelKind::LowBuy1);

        let alerts = evaluate_alerts(&[quote("BTC", dec!(60001))], &book);
        assert!(alerts.is_empty());
    }

    #[test]
    fn triggers_high_sell_at_or_above_threshold() {
        let book = book_with(
            "ETH",
            StrategyLevels {
                high_sell_1: Some(dec!(4000)),
                high_sell_2: Some(dec!(4500)),
                ..Default::default()
            },
        );

        let alerts = evaluate_alerts(&[quote("ETH", dec!(4600))], &book);
        let kinds: Vec<LevelKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![LevelKind::HighSell1, LevelKind::HighSell2]);
    }

    #[test]
    fn unknown_assets_and_unset_levels_stay_quiet() {
        let book = book_with("BTC", StrategyLevels::default());

        let alerts = evaluate_alerts(
            &[quote("BTC", dec!(1)), quote("DOGE", dec!(1))],
            &book,
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn alert_message_carries_price_and_roi() {
        let book = book_with(
            "BTC",
            StrategyLevels {
                low_buy_1: Some(dec!(60000)),
                ..Default::default()
            },
        );
        let alerts = evaluate_alerts(&[quote("BTC", dec!(59000))], &book);

        let message = alerts[0].to_string();
        assert!(message.contains("BTC reached Low Buy 1"));
        assert!(message.contains("<= 60000"));
        assert!(message.contains("ROI 10.00%"));
    }
}
