//! Strategy levels: persistence and alert evaluation

pub mod alerts;
pub mod levels;

pub use alerts::{evaluate_alerts, quotes_from_summary, AssetQuote, LevelKind, StrategyAlert};
pub use levels::{StrategyBook, StrategyLevels, StrategyStore};
