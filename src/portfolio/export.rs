//! Flat CSV export of the portfolio summary

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use crate::portfolio::types::{AssetOutcome, PortfolioSummary};

/// One exported row. Every field renders as plain text or a number; unpriced
/// and not-applicable fields stay empty rather than zero.
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    #[serde(rename = "Asset")]
    asset: &'a str,
    #[serde(rename = "Quantity")]
    quantity: Decimal,
    #[serde(rename = "Avg Cost")]
    average_cost: Option<Decimal>,
    #[serde(rename = "Price")]
    market_price: Option<Decimal>,
    #[serde(rename = "Value")]
    market_value: Option<Decimal>,
    #[serde(rename = "Unrealized PnL")]
    unrealized_pnl: Option<Decimal>,
    #[serde(rename = "Realized PnL")]
    realized_pnl: Option<Decimal>,
    #[serde(rename = "ROI %")]
    roi_pct: Option<Decimal>,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// Write the summary as CSV, one row per asset, header included.
pub fn write_csv<W: Write>(summary: &PortfolioSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in &summary.rows {
        let record = match &row.outcome {
            AssetOutcome::Computed { cost, valuation } => SummaryRecord {
                asset: &row.asset,
                quantity: row.quantity,
                average_cost: Some(cost.average_cost),
                market_price: valuation.market_price,
                market_value: valuation.market_value,
                unrealized_pnl: valuation.unrealized_pnl,
                realized_pnl: Some(cost.realized_pnl),
                roi_pct: valuation.roi_pct,
                status: if valuation.is_priced() { "ok" } else { "unpriced" },
            },
            AssetOutcome::Failed { .. } => SummaryRecord {
                asset: &row.asset,
                quantity: row.quantity,
                average_cost: None,
                market_price: None,
                market_value: None,
                unrealized_pnl: None,
                realized_pnl: None,
                roi_pct: None,
                status: "calculation error",
            },
        };
        csv_writer
            .serialize(record)
            .with_context(|| format!("failed to serialize CSV row for {}", row.asset))?;
    }

    csv_writer.flush().context("failed to flush CSV output")?;
    Ok(())
}
