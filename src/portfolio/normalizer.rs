//! Normalization of raw per-source holdings into canonical positions

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;

use crate::portfolio::error::PortfolioError;
use crate::portfolio::types::{Position, PositionSource, RawHolding};

/// Which account products feed the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFilter {
    pub spot: bool,
    pub earn: bool,
    pub auto_invest: bool,
    pub dual_invest: bool,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            spot: true,
            earn: true,
            auto_invest: true,
            dual_invest: true,
        }
    }
}

impl SourceFilter {
    /// Filter that includes only the listed sources.
    pub fn only(sources: &[PositionSource]) -> Self {
        Self {
            spot: sources.contains(&PositionSource::Spot),
            earn: sources.contains(&PositionSource::Earn),
            auto_invest: sources.contains(&PositionSource::AutoInvest),
            dual_invest: sources.contains(&PositionSource::DualInvest),
        }
    }

    pub fn includes(&self, source: PositionSource) -> bool {
        match source {
            PositionSource::Spot => self.spot,
            PositionSource::Earn => self.earn,
            PositionSource::AutoInvest => self.auto_invest,
            PositionSource::DualInvest => self.dual_invest,
        }
    }
}

/// Normalize raw holding records into one `Position` per `(asset, source)`.
///
/// Records from excluded sources are dropped. Malformed records (missing
/// asset, missing quantity, negative amounts) are skipped with a warning so
/// one bad record never blanks the whole dashboard. Zero-quantity records are
/// dropped silently. Duplicate `(asset, source)` records are merged by
/// summing their quantities; output order follows first discovery.
pub fn normalize_holdings(raw: &[RawHolding], filter: &SourceFilter) -> Vec<Position> {
    let mut positions: Vec<Position> = Vec::new();
    let mut index: HashMap<(String, PositionSource), usize> = HashMap::new();

    for record in raw {
        if !filter.includes(record.source) {
            continue;
        }
        let position = match validate_record(record) {
            Ok(Some(position)) => position,
            Ok(None) => continue,
            Err(error) => {
                warn!(source = %record.source, %error, "skipping holding record");
                continue;
            }
        };

        let key = (position.asset.clone(), position.source);
        match index.get(&key) {
            Some(&at) => positions[at].quantity += position.quantity,
            None => {
                index.insert(key, positions.len());
                positions.push(position);
            }
        }
    }

    positions
}

/// Validate a single record. `Ok(None)` means a well-formed record with
/// nothing held.
fn validate_record(record: &RawHolding) -> Result<Option<Position>, PortfolioError> {
    let asset = record
        .asset
        .as_deref()
        .map(str::trim)
        .filter(|asset| !asset.is_empty())
        .ok_or_else(|| PortfolioError::InvalidRecord {
            origin: record.source,
            reason: "missing asset identifier".to_string(),
        })?;

    let quantity = record
        .quantity
        .ok_or_else(|| PortfolioError::InvalidRecord {
            origin: record.source,
            reason: format!("missing quantity for {}", asset),
        })?;
    let locked = record.locked.unwrap_or(Decimal::ZERO);

    if quantity < Decimal::ZERO || locked < Decimal::ZERO {
        return Err(PortfolioError::InvalidRecord {
            origin: record.source,
            reason: format!("negative quantity for {}", asset),
        });
    }

    let total = quantity + locked;
    if total.is_zero() {
        return Ok(None);
    }

    Ok(Some(Position {
        asset: asset.to_uppercase(),
        quantity: total,
        source: record.source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(
        source: PositionSource,
        asset: Option<&str>,
        quantity: Option<Decimal>,
        locked: Option<Decimal>,
    ) -> RawHolding {
        RawHolding {
            source,
            asset: asset.map(str::to_string),
            quantity,
            locked,
        }
    }

    #[test]
    fn aggregates_free_and_locked() {
        let positions = normalize_holdings(
            &[raw(
                PositionSource::Spot,
                Some("btc"),
                Some(dec!(0.5)),
                Some(dec!(0.25)),
            )],
            &SourceFilter::default(),
        );

        assert_eq!(
            positions,
            vec![Position {
                asset: "BTC".to_string(),
                quantity: dec!(0.75),
                source: PositionSource::Spot,
            }]
        );
    }

    #[test]
    fn keeps_source_level_detail() {
        let positions = normalize_holdings(
            &[
                raw(PositionSource::Spot, Some("ETH"), Some(dec!(1)), None),
                raw(PositionSource::Earn, Some("ETH"), Some(dec!(2)), None),
            ],
            &SourceFilter::default(),
        );

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].source, PositionSource::Spot);
        assert_eq!(positions[1].source, PositionSource::Earn);
    }

    #[test]
    fn merges_duplicate_records_for_same_source() {
        let positions = normalize_holdings(
            &[
                raw(PositionSource::Earn, Some("SOL"), Some(dec!(3)), None),
                raw(PositionSource::Earn, Some("SOL"), Some(dec!(4)), None),
            ],
            &SourceFilter::default(),
        );

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, dec!(7));
    }

    #[test]
    fn skips_malformed_records_without_dropping_the_rest() {
        let positions = normalize_holdings(
            &[
                raw(PositionSource::Spot, None, Some(dec!(1)), None),
                raw(PositionSource::Spot, Some("  "), Some(dec!(1)), None),
                raw(PositionSource::Spot, Some("ADA"), None, None),
                raw(PositionSource::Spot, Some("DOT"), Some(dec!(-2)), None),
                raw(PositionSource::Spot, Some("BNB"), Some(dec!(5)), None),
            ],
            &SourceFilter::default(),
        );

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].asset, "BNB");
    }

    #[test]
    fn drops_zero_quantity_silently() {
        let positions = normalize_holdings(
            &[raw(
                PositionSource::Spot,
                Some("XRP"),
                Some(dec!(0)),
                Some(dec!(0)),
            )],
            &SourceFilter::default(),
        );

        assert!(positions.is_empty());
    }

    #[test]
    fn excluded_sources_are_dropped() {
        let positions = normalize_holdings(
            &[
                raw(PositionSource::Spot, Some("BTC"), Some(dec!(1)), None),
                raw(PositionSource::DualInvest, Some("BTC"), Some(dec!(1)), None),
            ],
            &SourceFilter::only(&[PositionSource::Spot]),
        );

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].source, PositionSource::Spot);
    }
}
