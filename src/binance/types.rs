//! Raw Binance API payloads and their conversions into engine inputs
//!
//! Binance encodes decimals as JSON strings; `rust_decimal`'s serde support
//! parses them without a float round-trip.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::{PositionSource, RawHolding, Transaction, TransactionSide};

/// Entry from `/api/v3/ticker/price`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: Decimal,
}

/// Entry from `/sapi/v1/capital/config/getall`
#[derive(Debug, Clone, Deserialize)]
pub struct CapitalBalance {
    pub coin: String,
    #[serde(default)]
    pub free: Option<Decimal>,
    #[serde(default)]
    pub locked: Option<Decimal>,
}

impl CapitalBalance {
    pub fn into_raw_holding(self) -> RawHolding {
        RawHolding {
            source: PositionSource::Spot,
            asset: Some(self.coin),
            quantity: self.free,
            locked: self.locked,
        }
    }
}

/// Entry from `/sapi/v1/staking/productPosition`
#[derive(Debug, Clone, Deserialize)]
pub struct StakingPosition {
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl StakingPosition {
    pub fn into_raw_holding(self) -> RawHolding {
        RawHolding {
            source: PositionSource::Earn,
            asset: self.asset,
            quantity: self.amount,
            locked: None,
        }
    }
}

/// Response from `/sapi/v1/lending/auto-invest/positions`
#[derive(Debug, Clone, Deserialize)]
pub struct AutoInvestPositions {
    #[serde(default)]
    pub positions: Vec<AutoInvestPosition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoInvestPosition {
    #[serde(default)]
    pub target_asset: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

impl AutoInvestPosition {
    pub fn into_raw_holding(self) -> RawHolding {
        RawHolding {
            source: PositionSource::AutoInvest,
            asset: self.target_asset,
            quantity: self.total_amount,
            locked: None,
        }
    }
}

/// Entry from `/sapi/v1/lending/dual/daily/product/list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualInvestPosition {
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default)]
    pub subscription_amount: Option<Decimal>,
}

impl DualInvestPosition {
    pub fn into_raw_holding(self) -> RawHolding {
        RawHolding {
            source: PositionSource::DualInvest,
            asset: self.underlying,
            quantity: self.subscription_amount,
            locked: None,
        }
    }
}

/// Entry from `/api/v3/myTrades`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    pub id: u64,
    pub symbol: String,
    pub price: Decimal,
    pub qty: Decimal,
    pub commission: Decimal,
    pub commission_asset: String,
    /// Execution time in epoch milliseconds.
    pub time: i64,
    pub is_buyer: bool,
}

impl AccountTrade {
    /// Convert into an engine transaction for the symbol's base asset.
    ///
    /// A commission taken in the quote asset becomes the transaction fee. A
    /// commission taken in the base asset shrinks the bought quantity
    /// instead; on sells only quote-denominated commissions affect proceeds.
    pub fn into_transaction(self, base_asset: &str, quote_asset: &str) -> Transaction {
        let side = if self.is_buyer {
            TransactionSide::Buy
        } else {
            TransactionSide::Sell
        };

        let mut quantity = self.qty;
        let mut fee = Decimal::ZERO;
        if self.commission_asset == quote_asset {
            fee = self.commission;
        } else if self.commission_asset == base_asset && self.is_buyer {
            quantity -= self.commission;
        }

        let timestamp: DateTime<Utc> =
            DateTime::from_timestamp_millis(self.time).unwrap_or_else(Utc::now);

        Transaction {
            asset: base_asset.to_string(),
            side,
            quantity,
            price: self.price,
            fee,
            timestamp,
            sequence: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(is_buyer: bool, commission_asset: &str) -> AccountTrade {
        AccountTrade {
            id: 42,
            symbol: "BTCUSDT".to_string(),
            price: dec!(100),
            qty: dec!(2),
            commission: dec!(0.001),
            commission_asset: commission_asset.to_string(),
            time: 1_700_000_000_000,
            is_buyer,
        }
    }

    #[test]
    fn parses_string_encoded_decimals() {
        let trade: AccountTrade = serde_json::from_str(
            r#"{
                "id": 7,
                "symbol": "BTCUSDT",
                "price": "25000.50",
                "qty": "0.004",
                "commission": "0.10",
                "commissionAsset": "USDT",
                "time": 1700000000000,
                "isBuyer": true
            }"#,
        )
        .unwrap();

        assert_eq!(trade.price, dec!(25000.50));
        assert_eq!(trade.qty, dec!(0.004));
    }

    #[test]
    fn quote_commission_becomes_the_fee() {
        let tx = trade(true, "USDT").into_transaction("BTC", "USDT");
        assert_eq!(tx.side, TransactionSide::Buy);
        assert_eq!(tx.quantity, dec!(2));
        assert_eq!(tx.fee, dec!(0.001));
        assert_eq!(tx.sequence, 42);
    }

    #[test]
    fn base_commission_shrinks_a_buy() {
        let tx = trade(true, "BTC").into_transaction("BTC", "USDT");
        assert_eq!(tx.quantity, dec!(1.999));
        assert_eq!(tx.fee, Decimal::ZERO);
    }

    #[test]
    fn sell_keeps_its_full_quantity() {
        let tx = trade(false, "USDT").into_transaction("BTC", "USDT");
        assert_eq!(tx.side, TransactionSide::Sell);
        assert_eq!(tx.quantity, dec!(2));
        assert_eq!(tx.fee, dec!(0.001));
    }
}
