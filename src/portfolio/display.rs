//! Console rendering of the portfolio summary

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::portfolio::types::{AssetOutcome, AssetRow, PortfolioSummary};

fn pnl_cell(value: Decimal) -> String {
    let text = format!("{:.2}", value);
    if value > Decimal::ZERO {
        format!("+{}", text.green())
    } else if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

fn optional_cell(value: Option<Decimal>, precision: usize) -> String {
    match value {
        Some(value) => format!("{:.*}", precision, value),
        None => "-".to_string(),
    }
}

/// Render the per-asset table.
pub fn format_summary_table(summary: &PortfolioSummary) -> String {
    if summary.is_empty() {
        return "No holdings detected for the connected account.\n".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Asset",
            "Quantity",
            "Sources",
            "Avg Cost",
            "Price",
            "Value",
            "Unrealized P&L",
            "Realized P&L",
            "ROI %",
        ]);

    for row in &summary.rows {
        let sources = row
            .sources
            .iter()
            .map(|p| p.source.label())
            .collect::<Vec<_>>()
            .join(", ");

        match &row.outcome {
            AssetOutcome::Computed { cost, valuation } => {
                table.add_row(vec![
                    row.asset.clone(),
                    format!("{:.6}", row.quantity),
                    sources,
                    format!("{:.4}", cost.average_cost),
                    optional_cell(valuation.market_price, 4),
                    optional_cell(valuation.market_value, 2),
                    valuation
                        .unrealized_pnl
                        .map(pnl_cell)
                        .unwrap_or_else(|| "-".to_string()),
                    pnl_cell(cost.realized_pnl),
                    valuation
                        .roi_pct
                        .map(|roi| format!("{:.2}%", roi))
                        .unwrap_or_else(|| "n/a".to_string()),
                ]);
            }
            AssetOutcome::Failed { error } => {
                table.add_row(vec![
                    row.asset.clone(),
                    format!("{:.6}", row.quantity),
                    sources,
                    format!("calculation error: {}", error),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]);
            }
        }
    }

    format!("{table}\n")
}

/// Render the totals block above the table.
pub fn format_totals(summary: &PortfolioSummary) -> String {
    let totals = &summary.totals;
    let mut output = String::new();

    output.push_str(&format!(
        "  Invested: ${:.2}   Value: ${:.2}   Unrealized: {}   Realized: {}\n",
        totals.total_cost_basis,
        totals.total_market_value,
        pnl_cell(totals.total_unrealized_pnl),
        pnl_cell(totals.total_realized_pnl),
    ));

    if !summary.unpriced_assets.is_empty() {
        output.push_str(&format!(
            "  {} No market price for {}; excluded from totals\n",
            "!".yellow(),
            summary.unpriced_assets.join(", "),
        ));
    }
    if !summary.failed_assets.is_empty() {
        output.push_str(&format!(
            "  {} Calculation failed for {}; see log for details\n",
            "!".red(),
            summary.failed_assets.join(", "),
        ));
    }

    output
}

/// Best and worst performer lines, by ROI over the priced rows.
pub fn format_movers(summary: &PortfolioSummary) -> Option<String> {
    let mut ranked: Vec<(&AssetRow, Decimal)> = summary
        .rows
        .iter()
        .filter_map(|row| {
            row.valuation()
                .and_then(|v| v.roi_pct)
                .map(|roi| (row, roi))
        })
        .collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let (best, best_roi) = ranked.first()?;
    let (worst, worst_roi) = ranked.last()?;
    Some(format!(
        "  Top gainer: {} ({:.2}%)   Top loser: {} ({:.2}%)\n",
        best.asset.green(),
        best_roi,
        worst.asset.red(),
        worst_roi,
    ))
}
