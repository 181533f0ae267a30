//! Error taxonomy for the portfolio engine
//!
//! Errors are isolated per asset: a malformed record is skipped, a bad ledger
//! fails only that asset's calculation, and a bad price degrades to the
//! unpriced state. Nothing here aborts a whole refresh.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::portfolio::types::PositionSource;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// A raw holding record that cannot be normalized. The record is skipped
    /// with a warning; the rest of the batch is unaffected.
    #[error("invalid {origin} holding record: {reason}")]
    InvalidRecord {
        origin: PositionSource,
        reason: String,
    },

    /// A ledger entry that cannot be replayed (non-positive quantity,
    /// negative price or fee). Aborts that asset's calculation only.
    #[error("invalid transaction #{sequence} for {asset}: {reason}")]
    InvalidTransaction {
        asset: String,
        sequence: u64,
        reason: String,
    },

    /// A sell larger than the tracked holding. Signals an inconsistent or
    /// incomplete history; clamping it would silently misstate realized P&L.
    #[error("sell of {sell_quantity} {asset} exceeds held quantity {held_quantity}")]
    Overdraft {
        asset: String,
        sell_quantity: Decimal,
        held_quantity: Decimal,
    },

    /// A zero or negative market price. A real market cannot quote one, so
    /// the engine treats the asset as unpriced rather than valuing it.
    #[error("non-positive market price {price} for {asset}")]
    InvalidPrice { asset: String, price: Decimal },
}
