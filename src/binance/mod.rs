//! Binance exchange collaborator: REST client, raw payloads, symbol helpers

pub mod client;
pub mod symbols;
pub mod types;

pub use client::{BinanceClient, ClientError, DEFAULT_BASE_URL};
pub use symbols::{guess_symbol, split_symbol, QUOTE_ASSETS};
