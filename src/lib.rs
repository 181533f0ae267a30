pub mod binance;
pub mod cli;
pub mod config;
pub mod data_paths;
pub use data_paths as data;
pub mod fetch;
pub mod logging;
pub mod notify;
pub mod portfolio;
pub mod strategy;
