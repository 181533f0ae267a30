//! Symbol parsing and ticker matching helpers

use rust_decimal::Decimal;
use std::collections::HashMap;

/// Quote assets a Binance symbol can end in, longest first so that e.g.
/// `FDUSD` wins over any shorter suffix it happens to share letters with.
pub const QUOTE_ASSETS: [&str; 10] = [
    "FDUSD", "USDT", "BUSD", "TUSD", "USDC", "BTC", "BNB", "ETH", "TRY", "EUR",
];

/// Split a symbol like `BTCUSDT` into `(base, quote)` by suffix-matching the
/// known quote assets. Returns `None` for symbols with no recognizable quote.
pub fn split_symbol(symbol: &str) -> Option<(String, String)> {
    let symbol = symbol.to_uppercase();
    for quote in QUOTE_ASSETS {
        if let Some(base) = symbol.strip_suffix(quote) {
            if !base.is_empty() {
                return Some((base.to_string(), quote.to_string()));
            }
        }
    }
    None
}

/// Find the ticker for an asset: the preferred quote first, then the common
/// quote list, then any symbol that starts with the asset name.
pub fn guess_symbol(
    asset: &str,
    prices: &HashMap<String, Decimal>,
    preferred_quote: &str,
) -> Option<String> {
    let asset = asset.to_uppercase();

    let preferred = format!("{}{}", asset, preferred_quote.to_uppercase());
    if prices.contains_key(&preferred) {
        return Some(preferred);
    }

    for quote in QUOTE_ASSETS {
        let candidate = format!("{}{}", asset, quote);
        if prices.contains_key(&candidate) {
            return Some(candidate);
        }
    }

    // Fall back to a deterministic prefix match.
    let mut candidates: Vec<&String> = prices
        .keys()
        .filter(|symbol| symbol.starts_with(&asset))
        .collect();
    candidates.sort();
    candidates.first().map(|symbol| (*symbol).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prices(symbols: &[&str]) -> HashMap<String, Decimal> {
        symbols
            .iter()
            .map(|symbol| (symbol.to_string(), dec!(1)))
            .collect()
    }

    #[test]
    fn splits_common_pairs() {
        assert_eq!(
            split_symbol("BTCUSDT"),
            Some(("BTC".to_string(), "USDT".to_string()))
        );
        assert_eq!(
            split_symbol("ethbtc"),
            Some(("ETH".to_string(), "BTC".to_string()))
        );
    }

    #[test]
    fn longest_quote_suffix_wins() {
        assert_eq!(
            split_symbol("SOLFDUSD"),
            Some(("SOL".to_string(), "FDUSD".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_and_degenerate_symbols() {
        assert_eq!(split_symbol("BTCXYZ"), None);
        // A bare quote asset has no base component.
        assert_eq!(split_symbol("USDT"), None);
    }

    #[test]
    fn prefers_the_requested_quote() {
        let prices = prices(&["BTCUSDT", "BTCEUR"]);
        assert_eq!(
            guess_symbol("BTC", &prices, "EUR"),
            Some("BTCEUR".to_string())
        );
        assert_eq!(
            guess_symbol("btc", &prices, "USDT"),
            Some("BTCUSDT".to_string())
        );
    }

    #[test]
    fn falls_back_through_the_quote_list() {
        let prices = prices(&["ADABNB"]);
        assert_eq!(
            guess_symbol("ADA", &prices, "USDT"),
            Some("ADABNB".to_string())
        );
    }

    #[test]
    fn unknown_asset_has_no_symbol() {
        let prices = prices(&["BTCUSDT"]);
        assert_eq!(guess_symbol("DOGE", &prices, "USDT"), None);
    }
}
