//! CLI subcommand implementations

pub mod alerts;
pub mod dashboard;
pub mod export;
pub mod strategy;
pub mod version;

use anyhow::{anyhow, Result};

use crate::portfolio::{PositionSource, SourceFilter};

/// Parse a comma-separated source list (`spot,earn,auto-invest,dual-invest`)
/// into a filter. No list means every source.
pub(crate) fn parse_source_filter(sources: Option<&str>) -> Result<SourceFilter> {
    let Some(list) = sources else {
        return Ok(SourceFilter::default());
    };

    let mut parsed: Vec<PositionSource> = Vec::new();
    for part in list.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        parsed.push(part.parse().map_err(|e: String| anyhow!(e))?);
    }
    if parsed.is_empty() {
        return Err(anyhow!("no valid sources in '{}'", list));
    }
    Ok(SourceFilter::only(&parsed))
}
